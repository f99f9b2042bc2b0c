//! Health check endpoint.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub annotator_loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub version: String,
}

/// Health check endpoint.
/// GET /health
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let model = state
        .annotators()
        .get()
        .map(|a| a.model_name().to_string());

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        annotator_loaded: model.is_some(),
        model,
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}
