//! `POST /api/risk` — cardiovascular risk scoring.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::AppState;
use crate::risk::{assess_risk, RiskAssessment, RiskFactors};

/// Wire shape: `smoker` arrives as "yes"/"no".
#[derive(Deserialize)]
pub struct RiskRequest {
    pub age: u32,
    pub bp: u32,
    pub chol: u32,
    pub smoker: String,
}

pub async fn predict(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RiskRequest>,
) -> Result<Json<RiskAssessment>, ApiError> {
    let factors = RiskFactors {
        age: req.age,
        bp: req.bp,
        chol: req.chol,
        smoker: req.smoker.eq_ignore_ascii_case("yes"),
    };

    let assessment = tokio::task::spawn_blocking(move || assess_risk(&state.chain, &factors))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok(Json(assessment))
}
