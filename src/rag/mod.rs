//! Retrieval-augmented answering: query rewriting, embedding gateway,
//! vector search, and the grounded-answer orchestrator.

pub mod answerer;
pub mod embedding;
pub mod prompt;
pub mod retrieval;
pub mod rewriter;

pub use answerer::{multimodal_answer, GroundedAnswer, RagAnswerer};
pub use embedding::{EmbeddingModel, OllamaEmbedder};
pub use retrieval::{
    InMemoryVectorSearch, PineconeIndex, ScoredPassage, UnconfiguredIndex, VectorSearch,
};
pub use rewriter::rewrite_query;

use crate::llm::DispatchError;

/// Errors from the retrieval-augmented pipeline.
#[derive(Debug, thiserror::Error)]
pub enum RagError {
    #[error("Query rewrite failed: {0}")]
    Rewrite(#[source] DispatchError),
    #[error("Embedding failed: {0}")]
    Embedding(String),
    #[error("Vector index unavailable: {0}")]
    RetrievalUnavailable(String),
    #[error("Answer generation failed: {0}")]
    Generation(#[from] DispatchError),
}
