//! Shared building blocks for context retrieval: the chunk corpus, the
//! capability traits for embedding and vector search, the error type,
//! layered configuration and context formatting.
#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod config;
pub mod corpus;
pub mod error;
pub mod format;
pub mod traits;
pub mod types;

pub use corpus::Corpus;
pub use error::{Error, Result};
pub use format::{format_context, ContextItem, CONTEXT_SEPARATOR};
pub use types::{Chunk, ChunkId, SearchHit, Section};
