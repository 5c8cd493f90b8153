use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::Json;
use core_platform::{FetchOutcome, Platform};
use serde::Deserialize;

use crate::error::ApiError;
use crate::responses::{ApiResponse, BatchRequest, BatchResponse, PostResponse, PostView};
use crate::AppState;

const NO_POSTS_MESSAGE: &str = "No posts found for this channel";

#[derive(Debug, Default, Deserialize)]
pub struct LatestPostQuery {
    #[serde(default)]
    include_raw: bool,
}

pub async fn latest_post(
    State(state): State<Arc<AppState>>,
    Path((platform, channel)): Path<(String, String)>,
    Query(query): Query<LatestPostQuery>,
) -> Result<Json<PostResponse>, ApiError> {
    let platform: Platform = platform.parse()?;

    let response = match state.fetcher.get_latest_post(platform, &channel).await? {
        Some(post) => ApiResponse::ok(
            Some(PostView::new(post, query.include_raw)),
            "Post retrieved successfully",
        ),
        None => ApiResponse::ok(None, NO_POSTS_MESSAGE),
    };

    Ok(Json(response))
}

pub async fn latest_posts_batch(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<BatchRequest>, JsonRejection>,
) -> Result<Json<BatchResponse>, ApiError> {
    let Json(request) = payload?;

    let mut channels = HashMap::with_capacity(request.channels.len());
    for (key, identifier) in request.channels {
        let platform = key.parse::<Platform>()?;
        if channels.insert(platform, identifier).is_some() {
            return Err(ApiError::BadRequest(format!(
                "Duplicate platform '{}' in channels",
                key
            )));
        }
    }
    let requested = channels.len();

    let outcomes = state
        .fetcher
        .get_latest_posts_from_multiple_channels(channels)
        .await;

    let mut data = BTreeMap::new();
    let mut errors = BTreeMap::new();
    for (platform, outcome) in outcomes {
        let key = platform.as_str().to_string();
        match outcome {
            FetchOutcome::Found(post) => {
                data.insert(key, post);
            }
            FetchOutcome::NoPosts => {
                errors.insert(key, NO_POSTS_MESSAGE.to_string());
            }
            FetchOutcome::Failed(e) => {
                errors.insert(key, e.to_string());
            }
        }
    }

    Ok(Json(BatchResponse {
        success: true,
        message: format!(
            "Retrieved posts from {} out of {} platforms",
            data.len(),
            requested
        ),
        data,
        errors,
    }))
}
