use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use thiserror::Error;

/// Output width of the configured sentence-embedding model
/// (all-MiniLM-L6-v2). The remote index must be created with this dimension.
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 384;

#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("embedding model error: {0}")]
    Model(String),
}

pub trait Embedder {
    fn dimensions(&self) -> usize;

    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError>;

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        texts.iter().map(|text| self.embed(text)).collect()
    }
}

/// Frozen all-MiniLM-L6-v2 sentence embedder. Loading the model weights is a
/// one-time startup cost; if it fails the process cannot serve.
pub struct MiniLmEmbedder {
    model: TextEmbedding,
}

impl MiniLmEmbedder {
    pub fn load() -> Result<Self, EmbedError> {
        let model = TextEmbedding::try_new(
            InitOptions::new(EmbeddingModel::AllMiniLML6V2).with_show_download_progress(false),
        )
        .map_err(|error| EmbedError::Model(error.to_string()))?;

        Ok(Self { model })
    }
}

impl Embedder for MiniLmEmbedder {
    fn dimensions(&self) -> usize {
        DEFAULT_EMBEDDING_DIMENSIONS
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        let mut vectors = self
            .model
            .embed(vec![text], None)
            .map_err(|error| EmbedError::Model(error.to_string()))?;

        vectors
            .pop()
            .ok_or_else(|| EmbedError::Model("model returned no vector".to_string()))
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        self.model
            .embed(texts.to_vec(), None)
            .map_err(|error| EmbedError::Model(error.to_string()))
    }
}
