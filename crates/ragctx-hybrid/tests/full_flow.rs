use std::path::PathBuf;
use std::sync::Arc;

use ragctx_core::config::{Config, EmbeddingBackend, VectorBackend};
use ragctx_core::Corpus;
use ragctx_embed::{get_default_embedder, EmbeddingCache};
use ragctx_hybrid::{RetrievalPath, Retriever};
use ragctx_vector::{open_store, search_handle, seed_corpus};

fn root_dir() -> PathBuf {
    // crates/ragctx-hybrid -> crates -> repo root
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).ancestors().nth(2).unwrap().to_path_buf()
}

#[tokio::test]
async fn shipped_corpus_through_memory_backend() -> anyhow::Result<()> {
    let root = root_dir();
    let config = Config::load_for_env(&root, "test")?;
    let settings = config.settings()?;
    assert_eq!(settings.embedding.backend, EmbeddingBackend::Fake);
    assert_eq!(settings.vector.backend, VectorBackend::Memory);

    let corpus = Arc::new(Corpus::load(&config.corpus_path(&settings))?);
    let cache = Arc::new(EmbeddingCache::new(get_default_embedder(&settings.embedding)?, settings.cache.max_size));
    let store = open_store(&settings.vector, settings.embedding.dimension)?;

    // Unseeded: the collection does not exist, so search errors and keyword takes over.
    let retriever = Retriever::new(corpus.clone(), cache.clone(), search_handle(store.clone()), &settings.retrieval);
    let out = retriever.retrieve("heartbeat reconnect").await;
    assert_eq!(out.path, RetrievalPath::Keyword);
    assert!(out.text.contains("heartbeat") || out.text.contains("Heartbeat"));

    let rows = seed_corpus(store.as_ref(), &cache, &corpus, true).await?;
    assert_eq!(rows, corpus.len());

    let out = retriever.retrieve("heartbeat reconnect").await;
    assert_eq!(out.path, RetrievalPath::Vector);
    assert_eq!(out.text.matches("\n\n---\n\n").count(), out.top_k - 1);
    assert!(cache.stats().size <= settings.cache.max_size);
    Ok(())
}
