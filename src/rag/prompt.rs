//! System prompts for the retrieval-augmented medical assistant.

/// Placeholder text recorded in history when the user sends an image
/// with no accompanying message.
pub const IMAGE_UPLOADED_PLACEHOLDER: &str = "Image uploaded";

/// Default instruction sent to the vision model when the user attaches
/// an image without any text.
pub const DEFAULT_IMAGE_INSTRUCTION: &str = "Analyze this image";

/// Rewrites a follow-up question into a standalone query. The model is
/// told to return the input unchanged when no reformulation is needed;
/// callers skip this entirely when the history is empty.
pub const CONTEXTUALIZE_SYSTEM_PROMPT: &str = "Given a chat history and the latest user question \
which might reference context in the chat history, formulate a standalone question which can be \
understood without the chat history. Do NOT answer the question, just reformulate it if needed \
and otherwise return it as is.";

/// Builds the answering system prompt with the retrieved passages
/// embedded as grounding context.
pub fn answer_system_prompt(passages: &[crate::rag::ScoredPassage]) -> String {
    let mut context = String::new();
    for passage in passages {
        context.push_str(&passage.text);
        context.push_str("\n\n");
    }

    format!(
        "You are a professional Medical Assistant. \
Use the provided context to answer accurately. \
If you don't know, say you don't know. \
Keep answers concise and professional.\n\n\
If the symptoms sound life-threatening, begin your response with the word EMERGENCY, \
then advise calling 911 immediately.\n\n\
Context:\n{context}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rag::ScoredPassage;

    fn passage(text: &str) -> ScoredPassage {
        ScoredPassage {
            text: text.to_string(),
            source: None,
            score: 0.9,
        }
    }

    #[test]
    fn answer_prompt_embeds_every_passage() {
        let prompt =
            answer_system_prompt(&[passage("aspirin thins blood"), passage("ibuprofen is an NSAID")]);
        assert!(prompt.contains("aspirin thins blood"));
        assert!(prompt.contains("ibuprofen is an NSAID"));
        assert!(prompt.contains("EMERGENCY"));
    }

    #[test]
    fn answer_prompt_with_no_passages_has_empty_context() {
        let prompt = answer_system_prompt(&[]);
        assert!(prompt.ends_with("Context:\n"));
    }
}
