//! Prompt data model shared by every model invocation.
//!
//! A `Prompt` is assembled once per call and never mutated afterwards:
//! a system instruction, the prior conversation turns, and a final user
//! block that may carry text, an image, or both. Backends translate it
//! into their own wire format.

use base64::Engine;
use serde::{Deserialize, Serialize};

/// Who produced a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// One exchange unit in a conversation. Immutable once created.
///
/// Turns carry text only; when a user message included an image, the
/// recorded turn holds a placeholder (the image itself is never replayed
/// into later prompts).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Inline image payload for multimodal prompts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    media_type: String,
    data_base64: String,
}

impl ImageAttachment {
    /// Encode raw image bytes for inline transport.
    pub fn from_bytes(media_type: &str, bytes: &[u8]) -> Self {
        Self {
            media_type: media_type.to_string(),
            data_base64: base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }

    /// Wrap an already base64-encoded payload.
    pub fn from_base64(media_type: &str, data_base64: String) -> Self {
        Self {
            media_type: media_type.to_string(),
            data_base64,
        }
    }

    /// Render as a `data:` URL, the form chat-completion APIs accept.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data_base64)
    }
}

/// A complete generation request: system instruction, prior turns, and
/// the final user block. Passed by value into backend calls.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: String,
    pub history: Vec<Turn>,
    pub user_text: String,
    pub user_image: Option<ImageAttachment>,
}

impl Prompt {
    pub fn new(system: impl Into<String>, user_text: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            history: Vec::new(),
            user_text: user_text.into(),
            user_image: None,
        }
    }

    pub fn with_history(mut self, history: Vec<Turn>) -> Self {
        self.history = history;
        self
    }

    pub fn with_image(mut self, image: ImageAttachment) -> Self {
        self.user_image = Some(image);
        self
    }

    pub fn has_image(&self) -> bool {
        self.user_image.is_some()
    }
}
