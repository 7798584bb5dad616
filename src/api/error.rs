//! API error types with structured JSON responses.
//!
//! Every failure path maps to a stable `{ "error": { code, message } }`
//! body. Provider errors and credentials never leak to clients; the
//! detail goes to the log instead.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::llm::DispatchError;
use crate::rag::RagError;
use crate::report::ReportError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Missing input: {0}")]
    MissingInput(&'static str),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("All generation backends are busy")]
    ServiceBusy,
    #[error("Retrieval collaborator unavailable")]
    RetrievalUnavailable,
    #[error("Model returned unusable output")]
    MalformedModelOutput,
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::MissingInput(what) => (
                StatusCode::BAD_REQUEST,
                "MISSING_INPUT",
                (*what).to_string(),
            ),
            ApiError::BadRequest(detail) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail.clone())
            }
            ApiError::ServiceBusy => (
                StatusCode::SERVICE_UNAVAILABLE,
                "SERVICE_BUSY",
                "The service is busy right now. Please try again.".to_string(),
            ),
            ApiError::RetrievalUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "UPSTREAM_UNAVAILABLE",
                "A required upstream service is unavailable.".to_string(),
            ),
            ApiError::MalformedModelOutput => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "MALFORMED_MODEL_OUTPUT",
                "The model returned an unusable response.".to_string(),
            ),
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred.".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<DispatchError> for ApiError {
    fn from(err: DispatchError) -> Self {
        tracing::error!(
            attempts = err.attempts().len(),
            error = %err,
            "Generation dispatch failed"
        );
        ApiError::ServiceBusy
    }
}

impl From<RagError> for ApiError {
    fn from(err: RagError) -> Self {
        match err {
            RagError::Rewrite(e) | RagError::Generation(e) => e.into(),
            RagError::Embedding(detail) | RagError::RetrievalUnavailable(detail) => {
                tracing::error!(detail, "Retrieval collaborator failed");
                ApiError::RetrievalUnavailable
            }
        }
    }
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::Generation(e) => e.into(),
            ReportError::NoJsonObject | ReportError::InvalidShape(_) => {
                tracing::error!(error = %err, "Report output unusable");
                ApiError::MalformedModelOutput
            }
            ReportError::Pdf(detail) => ApiError::Internal(detail),
        }
    }
}
