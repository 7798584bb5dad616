//! Request handlers, one module per feature.

pub mod chat;
pub mod health;
pub mod interactions;
pub mod labs;
pub mod report;
pub mod risk;

use std::collections::HashMap;

use axum::extract::Multipart;

use crate::api::error::ApiError;
use crate::llm::ImageAttachment;

const FALLBACK_IMAGE_TYPE: &str = "image/jpeg";

/// Multipart form drained into memory. Uploads are small (one image or
/// a few paragraphs of notes) and the body limit is enforced upstream.
pub(crate) struct FormData {
    fields: HashMap<String, FormField>,
}

struct FormField {
    content_type: Option<String>,
    bytes: Vec<u8>,
}

impl FormData {
    pub(crate) async fn read(multipart: &mut Multipart) -> Result<Self, ApiError> {
        let mut fields = HashMap::new();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::BadRequest(e.to_string()))?
        {
            let name = match field.name() {
                Some(name) => name.to_string(),
                None => continue,
            };
            let content_type = field.content_type().map(|ct| ct.to_string());
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(e.to_string()))?
                .to_vec();
            fields.insert(
                name,
                FormField {
                    content_type,
                    bytes,
                },
            );
        }
        Ok(Self { fields })
    }

    /// Text field, trimmed. Empty or absent fields yield an empty string.
    pub(crate) fn text(&self, name: &str) -> String {
        self.fields
            .get(name)
            .map(|f| String::from_utf8_lossy(&f.bytes).trim().to_string())
            .unwrap_or_default()
    }

    /// Image field as an attachment; empty uploads count as absent.
    pub(crate) fn image(&self, name: &str) -> Option<ImageAttachment> {
        let field = self.fields.get(name)?;
        if field.bytes.is_empty() {
            return None;
        }
        let media_type = field.content_type.as_deref().unwrap_or(FALLBACK_IMAGE_TYPE);
        Some(ImageAttachment::from_bytes(media_type, &field.bytes))
    }
}
