use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use ragctx_core::traits::Embedder;
use ragctx_core::{Error, Result};
use ragctx_embed::{EmbeddingCache, FakeEmbedder};

/// Records every text it is asked to embed; fails for texts containing "boom".
#[derive(Default)]
struct RecordingEmbedder {
    calls: AtomicUsize,
    seen: Mutex<Vec<String>>,
}

#[async_trait]
impl Embedder for RecordingEmbedder {
    fn model_id(&self) -> &str { "recording" }
    fn dim(&self) -> usize { 2 }
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(text.to_string());
        if text.contains("boom") { return Err(Error::EmbeddingProvider("rate limited".into())); }
        Ok(vec![text.len() as f32, 1.0])
    }
}

fn cache(max: usize) -> (Arc<RecordingEmbedder>, EmbeddingCache) {
    let provider = Arc::new(RecordingEmbedder::default());
    (provider.clone(), EmbeddingCache::new(provider, max))
}

#[tokio::test]
async fn equivalent_queries_embed_once_with_original_text() -> anyhow::Result<()> {
    let (provider, cache) = cache(10);
    let first = cache.get_embedding("What are your Skills?").await?;
    let second = cache.get_embedding("  what   are your skills！").await?;
    assert_eq!(first, second);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    assert_eq!(provider.seen.lock().unwrap().as_slice(), ["What are your Skills?".to_string()]);
    assert_eq!(cache.stats().size, 1);
    Ok(())
}

#[tokio::test]
async fn eviction_is_fifo_regardless_of_hits() -> anyhow::Result<()> {
    let (provider, cache) = cache(3);
    for q in ["one", "two", "three"] { cache.get_embedding(q).await?; }
    // Hitting the oldest entry must not refresh it.
    cache.get_embedding("one").await?;
    cache.get_embedding("one").await?;
    cache.get_embedding("four").await?;

    assert!(!cache.is_cached("one"), "first inserted key is evicted");
    for q in ["two", "three", "four"] { assert!(cache.is_cached(q), "{} should remain", q); }
    assert_eq!(cache.stats().size, 3);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 4);

    cache.get_embedding("one").await?;
    assert_eq!(provider.calls.load(Ordering::SeqCst), 5, "evicted key is re-embedded");
    assert!(!cache.is_cached("two"));
    Ok(())
}

#[tokio::test]
async fn provider_errors_propagate_and_are_not_cached() {
    let (provider, cache) = cache(3);
    let err = cache.get_embedding("boom").await.unwrap_err();
    assert!(matches!(err, Error::EmbeddingProvider(_)));
    assert_eq!(cache.stats().size, 0);
    let _ = cache.get_embedding("boom").await;
    assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn batch_preserves_order_and_fails_fast() -> anyhow::Result<()> {
    let (provider, cache) = cache(10);
    let out = cache.get_embeddings(&["a", "bbb", "cc"]).await?;
    let lens: Vec<f32> = out.iter().map(|v| v[0]).collect();
    assert_eq!(lens, vec![1.0, 3.0, 2.0]);

    let err = cache.get_embeddings(&["dd", "boom", "never"]).await;
    assert!(err.is_err());
    let seen = provider.seen.lock().unwrap().clone();
    assert!(!seen.contains(&"never".to_string()), "texts after a failure are not embedded");
    Ok(())
}

#[tokio::test]
async fn clear_and_stats() -> anyhow::Result<()> {
    let (_provider, cache) = cache(5);
    cache.get_embedding("x").await?;
    cache.get_embedding("y").await?;
    assert_eq!(cache.stats().size, 2);
    assert_eq!(cache.stats().max_size, 5);
    cache.clear();
    assert_eq!(cache.stats().size, 0);
    assert!(!cache.is_cached("x"));
    Ok(())
}

#[tokio::test]
async fn dimension_mismatch_is_a_provider_error() {
    struct Wrong;
    #[async_trait]
    impl Embedder for Wrong {
        fn model_id(&self) -> &str { "wrong" }
        fn dim(&self) -> usize { 4 }
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> { Ok(vec![0.0; 3]) }
    }
    let cache = EmbeddingCache::new(Arc::new(Wrong), 2);
    assert!(matches!(cache.get_embedding("q").await, Err(Error::EmbeddingProvider(_))));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_inserts_respect_bound() -> anyhow::Result<()> {
    let cache = Arc::new(EmbeddingCache::new(Arc::new(FakeEmbedder::new(16)), 8));
    let tasks: Vec<_> = (0..64)
        .map(|i| {
            let cache = cache.clone();
            tokio::spawn(async move { cache.get_embedding(&format!("query {}", i % 20)).await })
        })
        .collect();
    for result in futures::future::join_all(tasks).await { result??; }
    let stats = cache.stats();
    assert!(stats.size <= 8, "size {} exceeds bound", stats.size);
    Ok(())
}

/// Holds the embedding of "late" until the gate opens.
#[derive(Default)]
struct GatedEmbedder {
    calls: AtomicUsize,
    gate: tokio::sync::Notify,
}

#[async_trait]
impl Embedder for GatedEmbedder {
    fn model_id(&self) -> &str { "gated" }
    fn dim(&self) -> usize { 2 }
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if text == "late" { self.gate.notified().await; }
        Ok(vec![text.len() as f32, 0.0])
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_hits_do_not_change_eviction_order() -> anyhow::Result<()> {
    let provider = Arc::new(GatedEmbedder::default());
    let cache = Arc::new(EmbeddingCache::new(provider.clone(), 4));
    for q in ["a", "b", "c", "d"] { cache.get_embedding(q).await?; }

    let miss = {
        let cache = cache.clone();
        tokio::spawn(async move { cache.get_embedding("late").await })
    };
    // Hammer the oldest key while the miss is in flight.
    let hits: Vec<_> = (0..32)
        .map(|_| {
            let cache = cache.clone();
            tokio::spawn(async move { cache.get_embedding("a").await })
        })
        .collect();
    for result in futures::future::join_all(hits).await { result??; }
    provider.gate.notify_one();
    miss.await??;

    assert!(!cache.is_cached("a"), "first inserted key is evicted");
    for q in ["b", "c", "d", "late"] { assert!(cache.is_cached(q), "{} should remain", q); }
    assert_eq!(cache.stats().size, 4);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 5, "hits never reach the provider");
    Ok(())
}

#[tokio::test]
async fn fake_embedder_is_deterministic_and_normalised() -> anyhow::Result<()> {
    let fake = FakeEmbedder::new(32);
    let a = fake.embed("rust websocket").await?;
    let b = fake.embed("rust websocket").await?;
    assert_eq!(a, b);
    let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() < 1e-4);
    Ok(())
}
