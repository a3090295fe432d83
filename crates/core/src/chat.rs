use crate::embeddings::Embedder;
use crate::error::ChatError;
use crate::prompt::build_prompt;
use crate::traits::{ChatModel, VectorIndex};

/// Inputs answered with a canned reply, skipping retrieval and generation.
/// Matching is exact and case-sensitive.
pub const GREETINGS: [&str; 5] = ["hi", "hello", "hey", "good morning", "good evening"];

pub const GREETING_REPLY: &str = "Hello! I'm your medical assistant. How can I help you today?";

/// The one user-facing message every pipeline failure collapses into.
pub const ERROR_REPLY: &str = "Sorry, there was an error processing your request.";

/// Retriever depth matching the original deployment's default.
pub const DEFAULT_TOP_K: usize = 4;

/// Per-request pipeline: greeting short-circuit, embed, retrieve, prompt,
/// generate. Holds no per-request state; safe to share across requests.
pub struct ChatService<E, V, M> {
    embedder: E,
    index: V,
    model: M,
    top_k: usize,
}

impl<E, V, M> ChatService<E, V, M>
where
    E: Embedder + Send + Sync,
    V: VectorIndex + Send + Sync,
    M: ChatModel + Send + Sync,
{
    pub fn new(embedder: E, index: V, model: M) -> Self {
        Self {
            embedder,
            index,
            model,
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Answer one message. Terminal on first success or first failure;
    /// nothing is retried. Empty input is an ordinary non-greeting query.
    pub async fn answer(&self, message: &str) -> Result<String, ChatError> {
        if GREETINGS.contains(&message) {
            return Ok(GREETING_REPLY.to_string());
        }

        let query_vector = self
            .embedder
            .embed(message)
            .map_err(|error| ChatError::Retrieval(error.to_string()))?;

        let context = self
            .index
            .query(&query_vector, self.top_k)
            .await
            .map_err(|error| ChatError::Retrieval(error.to_string()))?;

        let prompt = build_prompt(&context, message);

        self.model
            .generate(&prompt)
            .await
            .map_err(|error| ChatError::Generation(error.to_string()))
    }
}
