//! `POST /api/interactions` — drug interaction check.

use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;

use crate::api::endpoints::FormData;
use crate::api::error::ApiError;
use crate::api::types::AppState;
use crate::interactions::check_interactions;

#[derive(Serialize)]
pub struct InteractionResponse {
    pub result: String,
}

pub async fn check(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<InteractionResponse>, ApiError> {
    let form = FormData::read(&mut multipart).await?;
    let msg = form.text("msg");
    let image = form.image("image");

    if msg.is_empty() && image.is_none() {
        return Err(ApiError::MissingInput("No medications provided."));
    }

    let result =
        tokio::task::spawn_blocking(move || check_interactions(&state.chain, &msg, image))
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok(Json(InteractionResponse { result }))
}
