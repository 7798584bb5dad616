//! `POST /api/chat` — the main assistant endpoint.
//!
//! Multipart form: `msg` (optional text), `image` (optional upload).
//! Plain-text response: the literal `TRIGGER_EMERGENCY` when a safety
//! gate fires, otherwise the answer text. Session identity comes from
//! the optional `X-Session-Id` header.

use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::HeaderMap;

use crate::api::endpoints::FormData;
use crate::api::error::ApiError;
use crate::api::types::AppState;
use crate::chat::{ChatOutcome, ChatPipeline};
use crate::conversation::DEFAULT_SESSION;
use crate::safety::TRIGGER_EMERGENCY;

pub async fn send(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<String, ApiError> {
    let form = FormData::read(&mut multipart).await?;
    let msg = form.text("msg");
    let image = form.image("image");

    if msg.is_empty() && image.is_none() {
        return Err(ApiError::MissingInput("No message provided."));
    }

    let session_id = headers
        .get("x-session-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or(DEFAULT_SESSION)
        .to_string();

    let request_id = uuid::Uuid::new_v4();
    tracing::info!(
        %request_id,
        session = session_id.as_str(),
        has_image = image.is_some(),
        "Chat request received"
    );

    let outcome = tokio::task::spawn_blocking(move || {
        let session = state.sessions.session(&session_id);
        let pipeline = ChatPipeline::new(
            &state.chain,
            state.embedder.as_ref(),
            state.index.as_ref(),
            state.post_check.as_ref(),
            state.top_k,
        );
        pipeline.handle(&session, &msg, image)
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok(match outcome {
        ChatOutcome::Emergency => TRIGGER_EMERGENCY.to_string(),
        ChatOutcome::Answer(text) => text,
    })
}
