//! ragctx-hybrid
//!
//! Top-k policy and the retrieval orchestrator that chains vector search,
//! keyword scoring and the static default context.
pub mod policy;
pub mod retriever;

pub use policy::TopKPolicy;
pub use retriever::{RetrievalPath, RetrievedContext, Retriever, StageOutcome};
