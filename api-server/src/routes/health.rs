use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::Utc;

use crate::responses::HealthResponse;
use crate::AppState;

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now(),
        version: state.config.app_version.clone(),
        available_platforms: state.fetcher.available_platforms(),
    })
}
