//! Collection management on top of [`VectorSearch`], used by seeding.
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use ragctx_core::traits::VectorSearch;
use ragctx_core::{Result, SearchHit};

/// One row of the vector collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VectorRecord {
    pub id: String,
    pub title: String,
    pub content: String,
    pub section: String,
    pub embedding: Vec<f32>,
}

#[async_trait]
pub trait VectorStore: VectorSearch {
    /// Create the collection if it does not exist yet.
    async fn ensure_collection(&self) -> Result<()>;
    /// Drop the collection. Dropping a missing collection is not an error.
    async fn drop_collection(&self) -> Result<()>;
    async fn insert(&self, records: &[VectorRecord]) -> Result<()>;
    async fn row_count(&self) -> Result<usize>;
}

/// Narrow a store to the search capability the retriever consumes.
pub fn search_handle(store: Arc<dyn VectorStore>) -> Arc<dyn VectorSearch> {
    Arc::new(StoreSearch(store))
}

struct StoreSearch(Arc<dyn VectorStore>);

#[async_trait]
impl VectorSearch for StoreSearch {
    async fn search(&self, embedding: &[f32], k: usize) -> Result<Vec<SearchHit>> { self.0.search(embedding, k).await }
}
