//! Layered retrieval: deadline-bounded vector search, then keyword scoring,
//! then a static default subset of the corpus.
//!
//! ```text
//! Start -> EmbedAndSearch -> Hits ------------------------------> Done
//!                         -> Empty | Timeout | Failed -> Keyword -> Hits -> Done
//!                                                               -> Empty -> Default -> Done
//! ```
//!
//! Every path ends in formatted context text; retrieval itself never fails.
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use ragctx_core::config::RetrievalSettings;
use ragctx_core::traits::VectorSearch;
use ragctx_core::{format_context, Chunk, Corpus, Error, SearchHit};
use ragctx_embed::EmbeddingCache;
use ragctx_text::keyword_search;

use crate::policy::TopKPolicy;

/// Which stage produced the context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrievalPath {
    Vector,
    Keyword,
    Default,
}

impl RetrievalPath {
    pub fn as_str(&self) -> &'static str {
        match self {
            RetrievalPath::Vector => "vector",
            RetrievalPath::Keyword => "keyword",
            RetrievalPath::Default => "default",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievedContext {
    pub text: String,
    pub path: RetrievalPath,
    pub top_k: usize,
}

/// Tagged result of a single stage.
#[derive(Debug)]
pub enum StageOutcome<T> {
    Hits(T),
    Empty,
    Timeout,
    Failed(Error),
}

pub struct Retriever {
    corpus: Arc<Corpus>,
    cache: Arc<EmbeddingCache>,
    vector: Arc<dyn VectorSearch>,
    policy: TopKPolicy,
    search_timeout: Duration,
    default_chunk_ids: Vec<String>,
}

impl Retriever {
    pub fn new(corpus: Arc<Corpus>, cache: Arc<EmbeddingCache>, vector: Arc<dyn VectorSearch>, settings: &RetrievalSettings) -> Self {
        Self {
            corpus,
            cache,
            vector,
            policy: TopKPolicy::from_settings(settings),
            search_timeout: Duration::from_millis(settings.search_timeout_ms),
            default_chunk_ids: settings.default_chunk_ids.clone(),
        }
    }

    pub fn with_search_timeout(mut self, timeout: Duration) -> Self { self.search_timeout = timeout; self }

    pub fn cache(&self) -> &EmbeddingCache { &self.cache }

    pub fn determine_top_k(&self, query: &str) -> usize { self.policy.determine(query) }

    /// Context text for `query`; never empty, never an error.
    pub async fn retrieve_context(&self, query: &str) -> String {
        self.retrieve(query).await.text
    }

    pub async fn retrieve(&self, query: &str) -> RetrievedContext {
        let top_k = self.policy.determine(query);
        debug!(top_k, "retrieving context");

        match self.vector_stage(query, top_k).await {
            StageOutcome::Hits(hits) => {
                info!(path = "vector", hits = hits.len(), "retrieved context");
                return RetrievedContext { text: format_context(&hits), path: RetrievalPath::Vector, top_k };
            }
            StageOutcome::Empty => warn!("empty vector search results, using keyword fallback"),
            StageOutcome::Timeout => {
                warn!(timeout_ms = self.search_timeout.as_millis() as u64, "vector search timed out, using keyword fallback")
            }
            StageOutcome::Failed(e) => warn!(error = %e, "vector search failed, using keyword fallback"),
        }

        if let StageOutcome::Hits(chunks) = self.keyword_stage(query, top_k) {
            info!(path = "keyword", hits = chunks.len(), "retrieved context");
            return RetrievedContext { text: format_context(&chunks), path: RetrievalPath::Keyword, top_k };
        }

        warn!("keyword search found nothing, using default chunks");
        RetrievedContext { text: self.default_context(), path: RetrievalPath::Default, top_k }
    }

    /// Embed the query and race the vector search against the deadline. On
    /// timeout the search future is dropped, never awaited.
    pub async fn vector_stage(&self, query: &str, top_k: usize) -> StageOutcome<Vec<SearchHit>> {
        let embedding = match self.cache.get_embedding(query).await {
            Ok(embedding) => embedding,
            Err(e) => return StageOutcome::Failed(e),
        };
        match tokio::time::timeout(self.search_timeout, self.vector.search(&embedding, top_k)).await {
            Err(_) => StageOutcome::Timeout,
            Ok(Err(e)) => StageOutcome::Failed(e),
            Ok(Ok(hits)) if hits.is_empty() => StageOutcome::Empty,
            Ok(Ok(mut hits)) => {
                hits.truncate(top_k);
                StageOutcome::Hits(hits)
            }
        }
    }

    /// Keyword scoring over the corpus. Never fails.
    pub fn keyword_stage(&self, query: &str, top_k: usize) -> StageOutcome<Vec<&Chunk>> {
        let scored = keyword_search(&self.corpus, query, top_k);
        if scored.is_empty() { return StageOutcome::Empty; }
        StageOutcome::Hits(scored.into_iter().map(|s| s.chunk).collect())
    }

    /// Formatted default subset, in corpus order.
    pub fn default_context(&self) -> String {
        format_context(self.corpus.default_chunks(&self.default_chunk_ids))
    }
}
