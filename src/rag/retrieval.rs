//! Vector search over the medical knowledge corpus.
//!
//! Two implementations behind one trait: a hosted Pinecone-style index
//! for production and an in-memory cosine index for tests and small
//! corpora.

use serde::{Deserialize, Serialize};

use super::RagError;

/// One retrieved passage with its relevance score.
#[derive(Debug, Clone)]
pub struct ScoredPassage {
    pub text: String,
    pub source: Option<String>,
    pub score: f32,
}

/// Trait for the vector index. `search` returns passages in descending
/// score order, at most `top_k` of them.
pub trait VectorSearch: Send + Sync {
    fn search(&self, vector: &[f32], top_k: usize) -> Result<Vec<ScoredPassage>, RagError>;
}

// ── Hosted index client ─────────────────────────────────────

/// Blocking client for a Pinecone-style query endpoint
/// (`POST {host}/query` with an `Api-Key` header).
pub struct PineconeIndex {
    host: String,
    api_key: String,
    client: reqwest::blocking::Client,
}

impl PineconeIndex {
    pub fn new(host: &str, api_key: &str, timeout_secs: u64) -> Result<Self, RagError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| RagError::RetrievalUnavailable(e.to_string()))?;

        Ok(Self {
            host: host.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Deserialize)]
struct QueryMatch {
    score: f32,
    #[serde(default)]
    metadata: Option<MatchMetadata>,
}

#[derive(Deserialize)]
struct MatchMetadata {
    #[serde(default)]
    text: String,
    #[serde(default)]
    source: Option<String>,
}

impl VectorSearch for PineconeIndex {
    fn search(&self, vector: &[f32], top_k: usize) -> Result<Vec<ScoredPassage>, RagError> {
        let url = format!("{}/query", self.host);
        let body = QueryRequest {
            vector,
            top_k,
            include_metadata: true,
        };

        let response = self
            .client
            .post(&url)
            .header("Api-Key", &self.api_key)
            .json(&body)
            .send()
            .map_err(|e| RagError::RetrievalUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RagError::RetrievalUnavailable(format!(
                "index returned HTTP {status}"
            )));
        }

        let parsed: QueryResponse = response
            .json()
            .map_err(|e| RagError::RetrievalUnavailable(e.to_string()))?;

        let passages = parsed
            .matches
            .into_iter()
            .filter_map(|m| {
                let meta = m.metadata?;
                if meta.text.is_empty() {
                    return None;
                }
                Some(ScoredPassage {
                    text: meta.text,
                    source: meta.source,
                    score: m.score,
                })
            })
            .collect();

        Ok(passages)
    }
}

/// Stand-in used when no index host is configured. Every search fails,
/// so requests surface the missing collaborator instead of quietly
/// answering without grounding.
pub struct UnconfiguredIndex;

impl VectorSearch for UnconfiguredIndex {
    fn search(&self, _vector: &[f32], _top_k: usize) -> Result<Vec<ScoredPassage>, RagError> {
        Err(RagError::RetrievalUnavailable(
            "no vector index configured".into(),
        ))
    }
}

// ── In-memory index ─────────────────────────────────────────

/// Brute-force cosine index. Good enough for tests and corpora that fit
/// in memory; the trait keeps it swappable for the hosted index.
#[derive(Default)]
pub struct InMemoryVectorSearch {
    entries: Vec<(Vec<f32>, String, Option<String>)>,
}

impl InMemoryVectorSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, vector: Vec<f32>, text: &str, source: Option<&str>) {
        self.entries
            .push((vector, text.to_string(), source.map(|s| s.to_string())));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

impl VectorSearch for InMemoryVectorSearch {
    fn search(&self, vector: &[f32], top_k: usize) -> Result<Vec<ScoredPassage>, RagError> {
        let mut scored: Vec<ScoredPassage> = self
            .entries
            .iter()
            .map(|(v, text, source)| ScoredPassage {
                text: text.clone(),
                source: source.clone(),
                score: cosine_similarity(vector, v),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        Ok(scored)
    }
}
