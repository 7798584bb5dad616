//! Chat pipeline: safety gates around retrieval-augmented answering.
//!
//! Order is fixed: the phrase scan runs before any model call, then the
//! request is answered (grounded text path, or direct vision path when
//! an image is attached), then the post-generation check inspects the
//! output. History is appended only when an exchange completes without
//! tripping either gate.

use std::sync::{Arc, Mutex};

use crate::conversation::ConversationState;
use crate::llm::{FailoverChain, ImageAttachment};
use crate::rag::prompt::IMAGE_UPLOADED_PLACEHOLDER;
use crate::rag::{multimodal_answer, EmbeddingModel, RagAnswerer, RagError, VectorSearch};
use crate::safety::{matches_emergency_phrase, PostGenerationSafetyCheck};

/// Result of one chat request.
#[derive(Debug, PartialEq)]
pub enum ChatOutcome {
    /// A safety gate fired; the caller returns the fixed trigger literal.
    Emergency,
    /// Normal grounded (or vision) answer.
    Answer(String),
}

/// One chat request's worth of wiring over the shared components.
pub struct ChatPipeline<'a> {
    chain: &'a FailoverChain,
    embedder: &'a dyn EmbeddingModel,
    index: &'a dyn VectorSearch,
    post_check: &'a dyn PostGenerationSafetyCheck,
    top_k: usize,
}

impl<'a> ChatPipeline<'a> {
    pub fn new(
        chain: &'a FailoverChain,
        embedder: &'a dyn EmbeddingModel,
        index: &'a dyn VectorSearch,
        post_check: &'a dyn PostGenerationSafetyCheck,
        top_k: usize,
    ) -> Self {
        Self {
            chain,
            embedder,
            index,
            post_check,
            top_k,
        }
    }

    /// Run one exchange against a session. The session lock is held for
    /// the whole exchange so concurrent requests on the same session
    /// serialize and history stays coherent.
    pub fn handle(
        &self,
        session: &Arc<Mutex<ConversationState>>,
        input: &str,
        image: Option<ImageAttachment>,
    ) -> Result<ChatOutcome, RagError> {
        if matches_emergency_phrase(input) {
            tracing::warn!("Emergency phrase detected in user input, skipping generation");
            return Ok(ChatOutcome::Emergency);
        }

        let mut state = session.lock().unwrap_or_else(|e| e.into_inner());

        let (answer, history_entry) = match image {
            Some(image) => {
                let text = multimodal_answer(self.chain, input, image)?;
                let entry = if input.trim().is_empty() {
                    IMAGE_UPLOADED_PLACEHOLDER.to_string()
                } else {
                    input.to_string()
                };
                (text, entry)
            }
            None => {
                let answerer = RagAnswerer::new(self.chain, self.embedder, self.index, self.top_k);
                let grounded = answerer.answer(input, state.turns())?;
                (grounded.text, input.to_string())
            }
        };

        if self.post_check.is_emergency(&answer) {
            tracing::warn!("Generated answer flagged as emergency");
            return Ok(ChatOutcome::Emergency);
        }

        state.append_exchange(&history_entry, &answer);
        Ok(ChatOutcome::Answer(answer))
    }
}
