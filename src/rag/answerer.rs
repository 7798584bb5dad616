//! Grounded-answer orchestration.
//!
//! Text questions flow rewrite → embed → search → generate. The rewritten
//! standalone query drives retrieval only; the answering prompt always
//! carries the user's original words plus the conversation history.
//! Image questions bypass retrieval entirely and go straight to the
//! chain as a vision prompt.

use crate::llm::{FailoverChain, ImageAttachment, Prompt, Turn};

use super::embedding::EmbeddingModel;
use super::prompt::{answer_system_prompt, DEFAULT_IMAGE_INSTRUCTION};
use super::retrieval::{ScoredPassage, VectorSearch};
use super::rewriter::rewrite_query;
use super::RagError;

/// A generated answer together with the evidence that grounded it.
#[derive(Debug)]
pub struct GroundedAnswer {
    pub text: String,
    pub passages: Vec<ScoredPassage>,
    pub standalone_query: String,
}

/// Orchestrator for retrieval-augmented answering.
pub struct RagAnswerer<'a> {
    chain: &'a FailoverChain,
    embedder: &'a dyn EmbeddingModel,
    index: &'a dyn VectorSearch,
    top_k: usize,
}

impl<'a> RagAnswerer<'a> {
    pub fn new(
        chain: &'a FailoverChain,
        embedder: &'a dyn EmbeddingModel,
        index: &'a dyn VectorSearch,
        top_k: usize,
    ) -> Self {
        Self {
            chain,
            embedder,
            index,
            top_k,
        }
    }

    /// Answer a text question grounded in retrieved passages.
    pub fn answer(&self, input: &str, history: &[Turn]) -> Result<GroundedAnswer, RagError> {
        let standalone_query =
            rewrite_query(self.chain, input, history).map_err(RagError::Rewrite)?;

        let vector = self.embedder.embed(&standalone_query)?;
        let passages = self.index.search(&vector, self.top_k)?;

        tracing::debug!(
            query = standalone_query.as_str(),
            retrieved = passages.len(),
            "Retrieved grounding passages"
        );

        let system = answer_system_prompt(&passages);
        let prompt = Prompt::new(&system, input).with_history(history.to_vec());
        let text = self.chain.generate(&prompt)?;

        Ok(GroundedAnswer {
            text,
            passages,
            standalone_query,
        })
    }
}

/// Answer an image question. Retrieval and rewriting are skipped; the
/// image and the user's text (or a default instruction when the text is
/// empty) go to the chain as a single history-free message.
pub fn multimodal_answer(
    chain: &FailoverChain,
    input: &str,
    image: ImageAttachment,
) -> Result<String, RagError> {
    let text = if input.trim().is_empty() {
        DEFAULT_IMAGE_INSTRUCTION
    } else {
        input
    };

    let prompt = Prompt::new("", text).with_image(image);

    Ok(chain.generate(&prompt)?)
}
