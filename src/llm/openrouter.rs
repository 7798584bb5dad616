//! OpenRouter-compatible chat-completion backend.
//!
//! One `OpenRouterClient` per configured model. The client is a single
//! attempt: any transport error, auth rejection, rate limit, or
//! malformed/empty response is reported as a `BackendError` and it is the
//! failover chain's job to decide what happens next.

use serde::{Deserialize, Serialize};

use super::prompt::{Prompt, Role};

/// Trait for chat-completion backends. One impl per provider protocol;
/// the failover chain holds these as trait objects in priority order.
pub trait ChatModel: Send + Sync {
    /// Identifier used in logs and attempt diagnostics.
    fn model_id(&self) -> &str;

    /// Single generation attempt. No internal retries.
    fn generate(&self, prompt: &Prompt) -> Result<String, BackendError>;
}

/// Why a single backend attempt failed.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Cannot reach backend at {0}")]
    Connection(String),
    #[error("Request timed out after {0}s")]
    Timeout(u64),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Authentication rejected by provider")]
    Auth,
    #[error("Rate limited by provider")]
    RateLimited,
    #[error("Provider returned HTTP {status}")]
    Provider { status: u16, body: String },
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    #[error("Backend returned empty output")]
    EmptyResponse,
}

/// Blocking HTTP client for one model behind an OpenAI-style
/// `/chat/completions` endpoint (OpenRouter and compatible gateways).
///
/// Model id, endpoint base, credential, and temperature are fixed at
/// construction.
pub struct OpenRouterClient {
    model: String,
    base_url: String,
    api_key: String,
    temperature: f32,
    timeout_secs: u64,
    client: reqwest::blocking::Client,
}

impl OpenRouterClient {
    pub fn new(
        model: &str,
        base_url: &str,
        api_key: &str,
        temperature: f32,
        timeout_secs: u64,
    ) -> Result<Self, BackendError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        Ok(Self {
            model: model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            temperature,
            timeout_secs,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn wire_messages(&self, prompt: &Prompt) -> Vec<WireMessage> {
        let mut messages = Vec::with_capacity(prompt.history.len() + 2);

        if !prompt.system.is_empty() {
            messages.push(WireMessage {
                role: "system",
                content: WireContent::Text(prompt.system.clone()),
            });
        }

        for turn in &prompt.history {
            messages.push(WireMessage {
                role: match turn.role {
                    Role::User => "user",
                    Role::Assistant => "assistant",
                },
                content: WireContent::Text(turn.content.clone()),
            });
        }

        let content = match &prompt.user_image {
            Some(image) => WireContent::Blocks(vec![
                ContentBlock::Text {
                    text: prompt.user_text.clone(),
                },
                ContentBlock::ImageUrl {
                    image_url: ImageUrl {
                        url: image.data_url(),
                    },
                },
            ]),
            None => WireContent::Text(prompt.user_text.clone()),
        };
        messages.push(WireMessage {
            role: "user",
            content,
        });

        messages
    }
}

impl ChatModel for OpenRouterClient {
    fn model_id(&self) -> &str {
        &self.model
    }

    fn generate(&self, prompt: &Prompt) -> Result<String, BackendError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            messages: self.wire_messages(prompt),
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    BackendError::Connection(self.base_url.clone())
                } else if e.is_timeout() {
                    BackendError::Timeout(self.timeout_secs)
                } else {
                    BackendError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(BackendError::Auth);
        }
        if status.as_u16() == 429 {
            return Err(BackendError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(BackendError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| BackendError::MalformedResponse(e.to_string()))?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(BackendError::EmptyResponse);
        }

        Ok(text)
    }
}

// ── Wire types ──────────────────────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage>,
    temperature: f32,
}

#[derive(Serialize)]
struct WireMessage {
    role: &'static str,
    content: WireContent,
}

#[derive(Serialize)]
#[serde(untagged)]
enum WireContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

// ── Mock backend for tests ──────────────────────────────────

/// Mock backend — returns a canned response or a canned failure, and
/// records every prompt it receives so tests can assert call order and
/// prompt contents.
pub struct MockChatModel {
    model: String,
    response: Option<String>,
    calls: std::sync::Mutex<Vec<Prompt>>,
    call_log: Option<std::sync::Arc<std::sync::Mutex<Vec<String>>>>,
}

impl MockChatModel {
    pub fn succeeding(model: &str, response: &str) -> Self {
        Self {
            model: model.to_string(),
            response: Some(response.to_string()),
            calls: std::sync::Mutex::new(Vec::new()),
            call_log: None,
        }
    }

    pub fn failing(model: &str) -> Self {
        Self {
            model: model.to_string(),
            response: None,
            calls: std::sync::Mutex::new(Vec::new()),
            call_log: None,
        }
    }

    /// Share a log across mocks to record cross-backend invocation order.
    pub fn with_log(mut self, log: std::sync::Arc<std::sync::Mutex<Vec<String>>>) -> Self {
        self.call_log = Some(log);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("mock lock").len()
    }

    pub fn last_prompt(&self) -> Option<Prompt> {
        self.calls.lock().expect("mock lock").last().cloned()
    }
}

impl ChatModel for MockChatModel {
    fn model_id(&self) -> &str {
        &self.model
    }

    fn generate(&self, prompt: &Prompt) -> Result<String, BackendError> {
        self.calls.lock().expect("mock lock").push(prompt.clone());
        if let Some(log) = &self.call_log {
            log.lock().expect("mock log lock").push(self.model.clone());
        }
        match &self.response {
            Some(text) => Ok(text.clone()),
            None => Err(BackendError::RateLimited),
        }
    }
}
