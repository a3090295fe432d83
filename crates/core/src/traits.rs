use crate::error::BackendError;
use crate::models::{Chunk, RetrievedChunk};
use crate::prompt::Prompt;
use async_trait::async_trait;

/// A remote nearest-neighbour index over chunk embeddings.
#[async_trait]
pub trait VectorIndex {
    /// Check the index exists with the given dimension, creating it if
    /// absent. Rejects an existing index configured with a different
    /// dimension.
    async fn ensure_index(&self, dimension: usize) -> Result<(), BackendError>;

    /// Write (chunk, embedding) records. Partial failures surface to the
    /// caller; nothing is retried.
    async fn upsert(&self, chunks: &[Chunk], embeddings: &[Vec<f32>])
        -> Result<usize, BackendError>;

    /// Top-k records by descending cosine similarity, with stored text and
    /// metadata.
    async fn query(&self, vector: &[f32], top_k: usize)
        -> Result<Vec<RetrievedChunk>, BackendError>;
}

/// A hosted chat-completion model.
#[async_trait]
pub trait ChatModel {
    async fn generate(&self, prompt: &Prompt) -> Result<String, BackendError>;
}
