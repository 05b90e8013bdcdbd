//! ragctx-text
//!
//! Deterministic lexical scoring of the corpus, used when vector search is
//! unavailable or empty. Pure over the corpus: no I/O, no shared state.
pub mod keyword;

pub use keyword::{keyword_search, score_chunk, ScoredChunk};
