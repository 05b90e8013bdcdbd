//! Capabilities consumed by the retrieval core. Implementations live in
//! `ragctx-embed` and `ragctx-vector`; tests provide their own doubles.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::SearchHit;

#[async_trait]
pub trait Embedder: Send + Sync {
    /// Stable identifier for the provider/model (e.g. `openai:text-embedding-3-small`).
    fn model_id(&self) -> &str;
    /// Embedding dimensionality (D).
    fn dim(&self) -> usize;
    /// Embed a single text. Failures are `Error::EmbeddingProvider`.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

#[async_trait]
pub trait VectorSearch: Send + Sync {
    /// Return at most `k` hits ranked by descending similarity.
    /// Failures are `Error::VectorSearch`.
    async fn search(&self, embedding: &[f32], k: usize) -> Result<Vec<SearchHit>>;
}
