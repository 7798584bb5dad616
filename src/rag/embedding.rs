//! Embedding gateway — opaque text→vector mapping behind a trait.
//!
//! The serving core never computes embeddings itself; it asks an external
//! endpoint for the query vector and hands that to the vector index.

use serde::{Deserialize, Serialize};

use super::RagError;

/// Trait for the embedding gateway.
pub trait EmbeddingModel: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>, RagError>;
    fn dimension(&self) -> usize;
}

/// Blocking client for an Ollama embeddings endpoint
/// (`POST /api/embeddings`).
pub struct OllamaEmbedder {
    base_url: String,
    model: String,
    dimension: usize,
    client: reqwest::blocking::Client,
}

impl OllamaEmbedder {
    pub fn new(
        base_url: &str,
        model: &str,
        dimension: usize,
        timeout_secs: u64,
    ) -> Result<Self, RagError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| RagError::Embedding(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            dimension,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

impl EmbeddingModel for OllamaEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, RagError> {
        let url = format!("{}/api/embeddings", self.base_url);
        let body = EmbeddingRequest {
            model: &self.model,
            prompt: text,
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .map_err(|e| RagError::Embedding(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RagError::Embedding(format!(
                "embedding endpoint returned HTTP {status}"
            )));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .map_err(|e| RagError::Embedding(e.to_string()))?;

        if parsed.embedding.is_empty() {
            return Err(RagError::Embedding("empty embedding vector".into()));
        }

        Ok(parsed.embedding)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedder_trims_trailing_slash() {
        let embedder = OllamaEmbedder::new("http://localhost:11434/", "nomic-embed-text", 768, 30)
            .unwrap();
        assert_eq!(embedder.base_url(), "http://localhost:11434");
        assert_eq!(embedder.dimension(), 768);
    }

    #[test]
    fn embedding_request_serializes_model_and_prompt() {
        let body = EmbeddingRequest {
            model: "nomic-embed-text",
            prompt: "chest pain causes",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "nomic-embed-text");
        assert_eq!(json["prompt"], "chest pain causes");
    }
}
