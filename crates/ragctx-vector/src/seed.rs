//! Populate a vector collection from the corpus.
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use ragctx_core::{Chunk, Corpus, Result};
use ragctx_embed::EmbeddingCache;

use crate::store::{VectorRecord, VectorStore};

/// Text embedded for a chunk: title, keywords and body on separate lines.
pub fn seed_text(chunk: &Chunk) -> String {
    format!("{}\n{}\n{}", chunk.title, chunk.keywords.join(", "), chunk.content)
}

/// Embed every chunk (through the cache) and insert the rows in one batch.
/// With `reset`, the collection is dropped first. Returns the row count.
pub async fn seed_corpus(store: &dyn VectorStore, cache: &EmbeddingCache, corpus: &Corpus, reset: bool) -> Result<usize> {
    if reset {
        info!("dropping existing collection");
        store.drop_collection().await?;
    }
    store.ensure_collection().await?;

    let pb = ProgressBar::new(corpus.len() as u64);
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks {msg}") {
        pb.set_style(style.progress_chars("#>-"));
    }
    let mut records = Vec::with_capacity(corpus.len());
    for chunk in corpus.chunks() {
        pb.set_message(chunk.id.clone());
        let embedding = cache.get_embedding(&seed_text(chunk)).await?;
        records.push(VectorRecord {
            id: chunk.id.clone(),
            title: chunk.title.clone(),
            content: chunk.content.clone(),
            section: chunk.section.to_string(),
            embedding,
        });
        pb.inc(1);
    }
    pb.finish_and_clear();

    store.insert(&records).await?;
    let rows = store.row_count().await?;
    info!(inserted = records.len(), rows, "seeding complete");
    Ok(rows)
}
