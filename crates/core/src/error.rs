use thiserror::Error;

use crate::embeddings::EmbedError;

/// A required environment variable was absent or empty.
#[derive(Debug, Error)]
#[error("missing required environment variable {0}")]
pub struct ConfigError(pub String);

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("pdf parse error: {0}")]
    PdfParse(String),

    #[error("path has no file name: {0}")]
    MissingFileName(String),

    #[error("invalid chunking config: {0}")]
    InvalidChunkConfig(String),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbedError),

    #[error("vector store error: {0}")]
    Store(#[from] BackendError),
}

/// Failures talking to a remote backend (Pinecone or Gemini).
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid response from {backend}: {details}")]
    BackendResponse { backend: String, details: String },

    #[error("serialize error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("index dimension {actual} does not match required {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("request failed: {0}")]
    Request(String),
}

/// Tagged failure kinds inside the chat pipeline. The HTTP boundary collapses
/// all of them into one user-facing message; the tag exists for logging.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("retrieval failed: {0}")]
    Retrieval(String),

    #[error("generation failed: {0}")]
    Generation(String),

    #[error("unexpected error: {0}")]
    Unknown(String),
}

pub type Result<T, E = IngestError> = std::result::Result<T, E>;
