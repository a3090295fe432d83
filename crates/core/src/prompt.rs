use crate::models::RetrievedChunk;

/// Persona and answer-from-context-only policy for the assistant.
pub const SYSTEM_PROMPT: &str = "You are a medical assistant for question-answering tasks. \
Use the following pieces of retrieved context to answer the question. \
If you don't know the answer, say that you don't know. \
Use three sentences maximum and keep the answer concise.";

/// A two-role prompt: system instruction (with stuffed context) and the
/// user's question.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// Stuff the retrieved chunk texts under the system instruction. An empty
/// context is passed through as-is; the model is still asked.
pub fn build_prompt(context: &[RetrievedChunk], question: &str) -> Prompt {
    let stuffed = context
        .iter()
        .map(|chunk| chunk.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    Prompt {
        system: format!("{SYSTEM_PROMPT}\n\n{stuffed}"),
        user: question.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{build_prompt, SYSTEM_PROMPT};
    use crate::models::RetrievedChunk;

    fn chunk(text: &str) -> RetrievedChunk {
        RetrievedChunk {
            id: "id".to_string(),
            text: text.to_string(),
            source: "/data/gale.pdf".to_string(),
            score: 0.9,
        }
    }

    #[test]
    fn prompt_stuffs_context_under_the_system_instruction() {
        let prompt = build_prompt(
            &[chunk("Aspirin thins blood."), chunk("Take with food.")],
            "How should I take aspirin?",
        );

        assert!(prompt.system.starts_with(SYSTEM_PROMPT));
        assert!(prompt.system.contains("Aspirin thins blood.\n\nTake with food."));
        assert_eq!(prompt.user, "How should I take aspirin?");
    }

    #[test]
    fn empty_context_still_produces_a_prompt() {
        let prompt = build_prompt(&[], "What is a fever?");
        assert!(prompt.system.starts_with(SYSTEM_PROMPT));
        assert_eq!(prompt.user, "What is a fever?");
    }
}
