//! `POST /api/report` — structured report generation as a PDF download.

use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::header;
use axum::response::IntoResponse;

use crate::api::endpoints::FormData;
use crate::api::error::ApiError;
use crate::api::types::AppState;
use crate::report::{generate_report, render_report_pdf};

pub async fn generate(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let form = FormData::read(&mut multipart).await?;
    let notes = form.text("notes");
    if notes.is_empty() {
        return Err(ApiError::MissingInput("No report provided."));
    }

    let pdf = tokio::task::spawn_blocking(move || {
        let report = generate_report(&state.chain, &notes)?;
        render_report_pdf(&report).map_err(ApiError::from)
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"medical_report.pdf\"",
            ),
        ],
        pdf,
    ))
}
