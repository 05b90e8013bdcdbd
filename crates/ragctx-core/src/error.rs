use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid corpus: {0}")]
    InvalidCorpus(String),

    /// Network, auth, rate-limit or decode failure from the embedding capability.
    #[error("Embedding provider error: {0}")]
    EmbeddingProvider(String),

    /// Any failure reported by the vector search capability.
    #[error("Vector search error: {0}")]
    VectorSearch(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
