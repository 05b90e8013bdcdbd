//! Brute-force cosine index held in process memory.
use async_trait::async_trait;
use std::cmp::Ordering;
use std::sync::{PoisonError, RwLock};

use ragctx_core::traits::VectorSearch;
use ragctx_core::{Error, Result, SearchHit};

use crate::store::{VectorRecord, VectorStore};

pub struct MemoryVectorIndex {
    dim: usize,
    // None until the collection is created.
    rows: RwLock<Option<Vec<VectorRecord>>>,
}

impl MemoryVectorIndex {
    pub fn new(dim: usize) -> Self { Self { dim, rows: RwLock::new(None) } }
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if na == 0.0 || nb == 0.0 { 0.0 } else { dot / (na * nb) }
}

#[async_trait]
impl VectorSearch for MemoryVectorIndex {
    async fn search(&self, embedding: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        if embedding.len() != self.dim {
            return Err(Error::VectorSearch(format!("dim mismatch: got {} expected {}", embedding.len(), self.dim)));
        }
        let guard = self.rows.read().unwrap_or_else(PoisonError::into_inner);
        let rows = guard.as_ref().ok_or_else(|| Error::VectorSearch("collection does not exist".into()))?;
        let mut hits: Vec<SearchHit> = rows
            .iter()
            .map(|r| SearchHit {
                id: r.id.clone(),
                title: r.title.clone(),
                content: r.content.clone(),
                section: r.section.clone(),
                score: cosine_similarity(embedding, &r.embedding),
            })
            .collect();
        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        hits.truncate(k);
        Ok(hits)
    }
}

#[async_trait]
impl VectorStore for MemoryVectorIndex {
    async fn ensure_collection(&self) -> Result<()> {
        let mut guard = self.rows.write().unwrap_or_else(PoisonError::into_inner);
        if guard.is_none() { *guard = Some(Vec::new()); }
        Ok(())
    }

    async fn drop_collection(&self) -> Result<()> {
        *self.rows.write().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }

    async fn insert(&self, records: &[VectorRecord]) -> Result<()> {
        if let Some(bad) = records.iter().find(|r| r.embedding.len() != self.dim) {
            return Err(Error::VectorSearch(format!("record '{}' has dim {} expected {}", bad.id, bad.embedding.len(), self.dim)));
        }
        let mut guard = self.rows.write().unwrap_or_else(PoisonError::into_inner);
        let rows = guard.as_mut().ok_or_else(|| Error::VectorSearch("collection does not exist".into()))?;
        for record in records {
            // Primary-key semantics: a re-inserted id replaces the old row.
            match rows.iter_mut().find(|r| r.id == record.id) {
                Some(existing) => *existing = record.clone(),
                None => rows.push(record.clone()),
            }
        }
        Ok(())
    }

    async fn row_count(&self) -> Result<usize> {
        let guard = self.rows.read().unwrap_or_else(PoisonError::into_inner);
        // A collection that was never created holds no rows.
        Ok(guard.as_ref().map_or(0, Vec::len))
    }
}
