//! ragctx-vector
//!
//! Implementations of the vector search capability: a Zilliz/Milvus REST
//! client and an in-memory cosine index, plus corpus seeding.
pub mod memory;
pub mod seed;
pub mod store;
pub mod zilliz;

use std::sync::Arc;
use std::time::Duration;

use ragctx_core::config::{VectorBackend, VectorSettings};
use ragctx_core::{Error, Result};

pub use memory::MemoryVectorIndex;
pub use seed::{seed_corpus, seed_text};
pub use store::{search_handle, VectorRecord, VectorStore};
pub use zilliz::ZillizClient;

/// Build the configured store. Endpoint and token fall back to
/// `ZILLIZ_ENDPOINT` / `ZILLIZ_API_KEY`.
pub fn open_store(settings: &VectorSettings, dim: usize) -> Result<Arc<dyn VectorStore>> {
    match settings.backend {
        VectorBackend::Memory => Ok(Arc::new(MemoryVectorIndex::new(dim))),
        VectorBackend::Zilliz => {
            let endpoint = settings.endpoint.clone().or_else(|| std::env::var("ZILLIZ_ENDPOINT").ok());
            let token = settings.token.clone().or_else(|| std::env::var("ZILLIZ_API_KEY").ok());
            let (Some(endpoint), Some(token)) = (endpoint, token) else {
                return Err(Error::InvalidConfig("ZILLIZ_ENDPOINT and ZILLIZ_API_KEY are required".into()));
            };
            let timeout = Duration::from_millis(settings.request_timeout_ms);
            Ok(Arc::new(ZillizClient::new(&endpoint, &token, &settings.collection, dim, timeout)?))
        }
    }
}
