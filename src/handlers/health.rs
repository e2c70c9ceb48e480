//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::{AppResult, AppState};

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: i64,
}

#[derive(Serialize)]
pub struct UpstreamHealthResponse {
    status: &'static str,
    upstream: String,
    response: String,
    timestamp: i64,
}

pub async fn check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().timestamp(),
    })
}

/// Probe the collaborator's `/health`
pub async fn upstream(State(state): State<AppState>) -> AppResult<Json<UpstreamHealthResponse>> {
    let response = state.client.health_check().await?;

    Ok(Json(UpstreamHealthResponse {
        status: "healthy",
        upstream: state.client.base_url().to_string(),
        response,
        timestamp: chrono::Utc::now().timestamp(),
    }))
}
