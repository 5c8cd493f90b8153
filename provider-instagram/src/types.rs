//! Instagram Graph API response types

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// User node (`/me`, `/{user-id}`)
#[derive(Debug, Clone, Deserialize)]
pub struct IgUser {
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
}

/// Media edge (`/{user-id}/media`)
#[derive(Debug, Deserialize)]
pub struct MediaListResponse {
    #[serde(default)]
    pub data: Vec<serde_json::Value>,
}

/// Media node
#[derive(Debug, Deserialize)]
pub struct IgMedia {
    pub id: String,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub permalink: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    pub timestamp: String,
    #[serde(default)]
    pub like_count: Option<u64>,
    #[serde(default)]
    pub comments_count: Option<u64>,
}

/// Parse a Graph API timestamp such as `2024-01-15T08:30:00+0000`
///
/// RFC 3339 offsets (`+00:00`, `Z`) are accepted as well.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%z")
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
