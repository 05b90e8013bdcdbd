//! ragctx-embed
//!
//! Query normalisation, the FIFO embedding cache and the embedding
//! providers (OpenAI over HTTP, deterministic fake).
pub mod cache;
pub mod fake;
pub mod normalize;
pub mod openai;

use std::sync::Arc;

use tracing::info;

use ragctx_core::config::{EmbeddingBackend, EmbeddingSettings};
use ragctx_core::traits::Embedder;
use ragctx_core::{Error, Result};

pub use cache::{CacheStats, EmbeddingCache};
pub use fake::FakeEmbedder;
pub use normalize::{hash_key, normalize_query};
pub use openai::OpenAiEmbedder;

/// Build the configured provider. `APP_USE_FAKE_EMBEDDINGS=1` forces the fake
/// embedder regardless of `embedding.backend`.
pub fn get_default_embedder(settings: &EmbeddingSettings) -> Result<Arc<dyn Embedder>> {
    let use_fake = std::env::var("APP_USE_FAKE_EMBEDDINGS").ok().map(|v| v == "1" || v.eq_ignore_ascii_case("true")).unwrap_or(false);
    if use_fake || settings.backend == EmbeddingBackend::Fake {
        info!(dim = settings.dimension, "using fake embedder");
        return Ok(Arc::new(FakeEmbedder::new(settings.dimension)));
    }
    let api_key = settings
        .api_key
        .clone()
        .or_else(|| std::env::var("OPENAI_API_KEY").ok())
        .ok_or_else(|| Error::InvalidConfig("embedding.api_key or OPENAI_API_KEY is required".into()))?;
    info!(model = %settings.model, dim = settings.dimension, "using OpenAI embedder");
    Ok(Arc::new(OpenAiEmbedder::new(&settings.base_url, &api_key, &settings.model, settings.dimension)))
}
