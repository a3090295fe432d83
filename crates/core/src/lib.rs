pub mod chat;
pub mod chunking;
pub mod config;
pub mod embeddings;
pub mod error;
pub mod extractor;
pub mod gemini;
pub mod indexer;
pub mod loader;
pub mod models;
pub mod prompt;
pub mod stores;
pub mod traits;

pub use chat::{ChatService, DEFAULT_TOP_K, ERROR_REPLY, GREETINGS, GREETING_REPLY};
pub use chunking::{split_documents, split_text, ChunkingConfig};
pub use config::{GeminiConfig, PineconeConfig, DEFAULT_GEMINI_MODEL, DEFAULT_INDEX_NAME};
pub use embeddings::{EmbedError, Embedder, MiniLmEmbedder, DEFAULT_EMBEDDING_DIMENSIONS};
pub use error::{BackendError, ChatError, ConfigError, IngestError};
pub use extractor::{extract_page_texts, PageText, PdfExtractor};
pub use gemini::GeminiModel;
pub use indexer::{run_indexing, IndexingOptions};
pub use loader::{discover_pdf_files, filter_to_minimal_docs, load_pdf_documents};
pub use models::{Chunk, Document, IndexingReport, RetrievedChunk};
pub use prompt::{build_prompt, Prompt, SYSTEM_PROMPT};
pub use stores::PineconeStore;
pub use traits::{ChatModel, VectorIndex};
