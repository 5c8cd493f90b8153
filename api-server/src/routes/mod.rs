pub mod channels;
pub mod health;
pub mod posts;

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::error::ApiError;
use crate::responses::ApiInfo;
use crate::AppState;

pub async fn api_info(State(state): State<Arc<AppState>>) -> Json<ApiInfo> {
    Json(ApiInfo {
        name: state.config.app_name.clone(),
        version: state.config.app_version.clone(),
        health_check: format!("{}/health", state.config.api_prefix),
    })
}

pub async fn not_found() -> ApiError {
    ApiError::RouteNotFound
}
