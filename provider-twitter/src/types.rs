//! X API v2 response types

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Single-user lookup (`/users/{id}`, `/users/by/username/{username}`)
///
/// Unknown users come back as 200 with an `errors` array and no `data`.
#[derive(Debug, Deserialize)]
pub struct UserResponse {
    #[serde(default)]
    pub data: Option<User>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub username: String,
    #[serde(default)]
    pub public_metrics: Option<UserMetrics>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserMetrics {
    #[serde(default)]
    pub followers_count: u64,
}

/// User timeline (`/users/{id}/tweets`)
///
/// Tweets are kept as raw JSON so the selected tweet can be attached to the
/// post as its raw payload.
#[derive(Debug, Deserialize)]
pub struct TimelineResponse {
    #[serde(default)]
    pub data: Vec<serde_json::Value>,
    #[serde(default)]
    pub includes: Includes,
}

#[derive(Debug, Default, Deserialize)]
pub struct Includes {
    #[serde(default)]
    pub media: Vec<Media>,
}

#[derive(Debug, Deserialize)]
pub struct Media {
    pub media_key: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub preview_image_url: Option<String>,
}

impl Media {
    /// Full-size URL for photos, preview image for video and GIFs
    pub fn best_url(&self) -> Option<&str> {
        self.url.as_deref().or(self.preview_image_url.as_deref())
    }
}

#[derive(Debug, Deserialize)]
pub struct Tweet {
    pub id: String,
    #[serde(default)]
    pub text: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub public_metrics: TweetMetrics,
    #[serde(default)]
    pub attachments: Option<Attachments>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TweetMetrics {
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub retweet_count: u64,
    #[serde(default)]
    pub reply_count: u64,
    #[serde(default)]
    pub quote_count: u64,
}

#[derive(Debug, Default, Deserialize)]
pub struct Attachments {
    #[serde(default)]
    pub media_keys: Vec<String>,
}
