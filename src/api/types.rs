//! Shared state for the HTTP layer.

use std::sync::Arc;

use crate::config::Config;
use crate::conversation::SessionStore;
use crate::llm::{BackendError, FailoverChain, OpenRouterClient};
use crate::rag::{
    EmbeddingModel, OllamaEmbedder, PineconeIndex, RagError, UnconfiguredIndex, VectorSearch,
};
use crate::safety::{EmergencyPrefixCheck, PostGenerationSafetyCheck};

/// Failure while wiring up shared state at startup.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Backend client construction failed: {0}")]
    Backend(#[from] BackendError),
    #[error("Collaborator client construction failed: {0}")]
    Collaborator(#[from] RagError),
}

/// Everything the handlers share. Built once in `main`, cloned as an
/// `Arc` into each request.
pub struct AppState {
    pub chain: FailoverChain,
    pub embedder: Box<dyn EmbeddingModel>,
    pub index: Box<dyn VectorSearch>,
    pub post_check: Box<dyn PostGenerationSafetyCheck>,
    pub sessions: SessionStore,
    pub top_k: usize,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Arc<Self>, StartupError> {
        let mut backends: Vec<Box<dyn crate::llm::ChatModel>> = Vec::new();
        for model in &config.models {
            backends.push(Box::new(OpenRouterClient::new(
                model,
                &config.base_url,
                &config.api_key,
                config.temperature,
                config.timeout_secs,
            )?));
        }
        let chain = FailoverChain::new(backends);
        tracing::info!(backends = chain.len(), "Failover chain configured");

        let embedder = OllamaEmbedder::new(
            &config.embedding_url,
            &config.embedding_model,
            config.embedding_dim,
            config.timeout_secs,
        )?;

        let index: Box<dyn VectorSearch> = match &config.index_host {
            Some(host) => Box::new(PineconeIndex::new(
                host,
                &config.index_api_key,
                config.timeout_secs,
            )?),
            None => {
                tracing::warn!("No vector index configured; chat requests will fail until one is");
                Box::new(UnconfiguredIndex)
            }
        };

        Ok(Arc::new(Self {
            chain,
            embedder: Box::new(embedder),
            index,
            post_check: Box::new(EmergencyPrefixCheck),
            sessions: SessionStore::new(config.history_cap),
            top_k: config.top_k,
        }))
    }
}
