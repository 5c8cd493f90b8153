use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use core_platform::Platform;

use crate::error::ApiError;
use crate::responses::{ApiResponse, ChannelResponse};
use crate::AppState;

pub async fn channel_info(
    State(state): State<Arc<AppState>>,
    Path((platform, channel)): Path<(String, String)>,
) -> Result<Json<ChannelResponse>, ApiError> {
    let platform: Platform = platform.parse()?;
    let info = state.fetcher.get_channel_info(platform, &channel).await?;

    Ok(Json(ApiResponse::ok(
        info,
        "Channel information retrieved successfully",
    )))
}
