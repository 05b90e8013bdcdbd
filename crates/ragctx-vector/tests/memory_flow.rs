use std::sync::Arc;

use ragctx_core::traits::VectorSearch;
use ragctx_core::{Chunk, Corpus, Section};
use ragctx_embed::{EmbeddingCache, FakeEmbedder};
use ragctx_vector::{seed_corpus, seed_text, MemoryVectorIndex, VectorRecord, VectorStore};

fn corpus() -> Corpus {
    let chunk = |id: &str, title: &str, kw: &[&str], content: &str| Chunk {
        id: id.into(),
        title: title.into(),
        content: content.into(),
        section: Section::Skills,
        keywords: kw.iter().map(|k| k.to_string()).collect(),
        related_chunks: vec![],
    };
    Corpus::from_chunks(vec![
        chunk("rust", "Rust services", &["rust", "tokio"], "async rust services with tokio"),
        chunk("react", "React frontend", &["react", "nextjs"], "react components and hooks"),
        chunk("infra", "Infrastructure", &["terraform", "aws"], "terraform modules on aws"),
    ])
    .unwrap()
}

#[tokio::test]
async fn seed_then_search_in_memory() -> anyhow::Result<()> {
    let store = MemoryVectorIndex::new(64);
    let cache = EmbeddingCache::new(Arc::new(FakeEmbedder::new(64)), 100);
    let corpus = corpus();

    let rows = seed_corpus(&store, &cache, &corpus, false).await?;
    assert_eq!(rows, 3);
    assert_eq!(cache.stats().size, 3, "seed texts go through the cache");

    let query = FakeEmbedder::new(64).embed_sync(&seed_text(&corpus.chunks()[1]));
    let hits = store.search(&query, 2).await?;
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].id, "react");
    assert_eq!(hits[0].section, "skills");
    assert!(hits[0].score >= hits[1].score);
    Ok(())
}

#[tokio::test]
async fn reseed_with_reset_does_not_duplicate() -> anyhow::Result<()> {
    let store = MemoryVectorIndex::new(16);
    let cache = EmbeddingCache::new(Arc::new(FakeEmbedder::new(16)), 100);
    let corpus = corpus();
    seed_corpus(&store, &cache, &corpus, false).await?;
    assert_eq!(seed_corpus(&store, &cache, &corpus, true).await?, 3);
    assert_eq!(seed_corpus(&store, &cache, &corpus, false).await?, 3, "ids are primary keys");
    Ok(())
}

#[tokio::test]
async fn missing_collection_and_bad_dims_are_errors() -> anyhow::Result<()> {
    let store = MemoryVectorIndex::new(4);
    assert!(store.search(&[0.0; 4], 3).await.is_err());
    store.drop_collection().await?;
    store.ensure_collection().await?;
    assert!(store.search(&[1.0; 3], 3).await.is_err());
    let bad = VectorRecord { id: "x".into(), title: "X".into(), content: String::new(), section: "core".into(), embedding: vec![1.0; 2] };
    assert!(store.insert(&[bad]).await.is_err());
    assert_eq!(store.row_count().await?, 0);
    assert!(store.search(&[1.0; 4], 3).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn row_count_is_zero_before_the_collection_exists() -> anyhow::Result<()> {
    let store = MemoryVectorIndex::new(4);
    assert_eq!(store.row_count().await?, 0);

    let cache = EmbeddingCache::new(Arc::new(FakeEmbedder::new(4)), 10);
    seed_corpus(&store, &cache, &corpus(), false).await?;
    assert_eq!(store.row_count().await?, 3);
    store.drop_collection().await?;
    assert_eq!(store.row_count().await?, 0, "dropped collection reports no rows");
    Ok(())
}
