//! Response envelopes

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use core_platform::{ChannelInfo, Platform, Post};
use serde::{Deserialize, Serialize};

/// Success envelope shared by the single-resource endpoints
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
        }
    }
}

pub type PostResponse = ApiResponse<Option<PostView>>;
pub type ChannelResponse = ApiResponse<ChannelInfo>;

/// A post as rendered on the wire, with the upstream payload on request
#[derive(Debug, Serialize)]
pub struct PostView {
    #[serde(flatten)]
    pub post: Post,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<serde_json::Value>,
}

impl PostView {
    pub fn new(post: Post, include_raw: bool) -> Self {
        let raw_response = if include_raw {
            post.raw_response().cloned()
        } else {
            None
        };
        Self { post, raw_response }
    }
}

#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    /// Platform name to channel identifier
    pub channels: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub success: bool,
    pub data: BTreeMap<String, Post>,
    pub errors: BTreeMap<String, String>,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub available_platforms: Vec<Platform>,
}

#[derive(Debug, Serialize)]
pub struct ApiInfo {
    pub name: String,
    pub version: String,
    pub health_check: String,
}
