//! `POST /api/labs/analyze` — lab report image analysis.

use std::sync::Arc;

use axum::extract::{Multipart, State};

use crate::api::endpoints::FormData;
use crate::api::error::ApiError;
use crate::api::types::AppState;
use crate::labs::analyze_lab_report;

pub async fn analyze(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<String, ApiError> {
    let form = FormData::read(&mut multipart).await?;
    let image = form
        .image("image")
        .ok_or(ApiError::MissingInput("No report provided."))?;

    let analysis =
        tokio::task::spawn_blocking(move || analyze_lab_report(&state.chain, image))
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok(analysis)
}
