//! In-process embedding cache keyed by the hash of the normalised query.
//!
//! Eviction is FIFO by insertion order: a hit never refreshes an entry, and
//! re-inserting an existing key keeps its original position.
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, error};

use ragctx_core::traits::Embedder;
use ragctx_core::{Error, Result};

use crate::normalize::{hash_key, normalize_query};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub size: usize,
    pub max_size: usize,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<String, Vec<f32>>,
    order: VecDeque<String>,
}

pub struct EmbeddingCache {
    provider: Arc<dyn Embedder>,
    max_size: usize,
    state: Mutex<CacheState>,
}

impl EmbeddingCache {
    pub fn new(provider: Arc<dyn Embedder>, max_size: usize) -> Self {
        Self { provider, max_size: max_size.max(1), state: Mutex::new(CacheState::default()) }
    }

    /// Embedding for `query`, served from the cache when an equivalent query
    /// was embedded before. On a miss the provider sees the original text,
    /// not the normalised form.
    pub async fn get_embedding(&self, query: &str) -> Result<Vec<f32>> {
        let key = hash_key(&normalize_query(query));
        let cached = self.lock().entries.get(&key).cloned();
        if let Some(hit) = cached {
            debug!(%key, "embedding cache hit");
            return Ok(hit);
        }
        debug!(%key, model = self.provider.model_id(), "embedding cache miss");
        let embedding = self.provider.embed(query).await.map_err(|e| {
            error!(error = %e, "embedding provider failed");
            match e {
                Error::EmbeddingProvider(msg) => Error::EmbeddingProvider(msg),
                other => Error::EmbeddingProvider(other.to_string()),
            }
        })?;
        if embedding.len() != self.provider.dim() {
            return Err(Error::EmbeddingProvider(format!(
                "dim mismatch: got {} expected {}",
                embedding.len(),
                self.provider.dim()
            )));
        }
        self.insert(key, embedding.clone());
        Ok(embedding)
    }

    /// Sequential batch lookup. Output order matches input order; the first
    /// failure aborts the batch.
    pub async fn get_embeddings<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<Vec<f32>>> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts { out.push(self.get_embedding(text.as_ref()).await?); }
        Ok(out)
    }

    /// Whether an equivalent query is currently cached.
    pub fn is_cached(&self, query: &str) -> bool {
        self.lock().entries.contains_key(&hash_key(&normalize_query(query)))
    }

    pub fn clear(&self) {
        let mut state = self.lock();
        state.entries.clear();
        state.order.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats { size: self.lock().entries.len(), max_size: self.max_size }
    }

    fn insert(&self, key: String, embedding: Vec<f32>) {
        let mut state = self.lock();
        if let Some(slot) = state.entries.get_mut(&key) {
            // Concurrent miss on the same key: keep the original position.
            *slot = embedding;
            return;
        }
        while state.entries.len() >= self.max_size {
            let Some(oldest) = state.order.pop_front() else { break };
            state.entries.remove(&oldest);
        }
        state.order.push_back(key.clone());
        state.entries.insert(key, embedding);
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
