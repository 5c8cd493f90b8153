//! Normalized data model shared by every platform

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::error::FetchError;

/// Supported social media platforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Video platform
    YouTube,
    /// Microblog platform
    Twitter,
    /// Photo platform
    Instagram,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::YouTube, Platform::Twitter, Platform::Instagram];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::YouTube => "youtube",
            Platform::Twitter => "twitter",
            Platform::Instagram => "instagram",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid platform '{0}'. Valid platforms: youtube, twitter, instagram")]
pub struct ParsePlatformError(pub String);

impl FromStr for Platform {
    type Err = ParsePlatformError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str() == normalized)
            .ok_or_else(|| ParsePlatformError(s.to_string()))
    }
}

/// A single post normalized across platforms
///
/// The raw upstream payload is kept for diagnostics only. It is skipped during
/// serialization and reachable through [`Post::raw_response`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub platform: Platform,
    pub author: String,
    pub author_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub url: String,
    #[serde(default)]
    pub media_urls: Vec<String>,
    #[serde(default)]
    pub engagement: BTreeMap<String, u64>,
    #[serde(skip)]
    raw: Option<serde_json::Value>,
}

impl Post {
    pub fn new(id: impl Into<String>, platform: Platform, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            platform,
            author: String::new(),
            author_id: String::new(),
            content: String::new(),
            created_at,
            url: String::new(),
            media_urls: Vec::new(),
            engagement: BTreeMap::new(),
            raw: None,
        }
    }

    pub fn with_author(mut self, name: impl Into<String>, id: impl Into<String>) -> Self {
        self.author = name.into();
        self.author_id = id.into();
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_media_urls(mut self, media_urls: Vec<String>) -> Self {
        self.media_urls = media_urls;
        self
    }

    pub fn with_engagement(mut self, metric: impl Into<String>, count: u64) -> Self {
        self.engagement.insert(metric.into(), count);
        self
    }

    pub fn with_raw_response(mut self, raw: serde_json::Value) -> Self {
        self.raw = Some(raw);
        self
    }

    /// Upstream payload the post was built from, when the provider kept it
    pub fn raw_response(&self) -> Option<&serde_json::Value> {
        self.raw.as_ref()
    }

    pub fn engagement_count(&self, metric: &str) -> u64 {
        self.engagement.get(metric).copied().unwrap_or(0)
    }
}

/// Channel or account metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelInfo {
    pub id: String,
    pub name: String,
    pub username: Option<String>,
    pub platform: Platform,
    pub url: String,
    pub follower_count: Option<u64>,
}

/// Per-platform result of a multi-channel fetch
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Found(Post),
    /// The channel exists but has no recent content
    NoPosts,
    Failed(FetchError),
}

impl FetchOutcome {
    pub fn post(&self) -> Option<&Post> {
        match self {
            FetchOutcome::Found(post) => Some(post),
            _ => None,
        }
    }

    pub fn into_post(self) -> Option<Post> {
        match self {
            FetchOutcome::Found(post) => Some(post),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            FetchOutcome::Failed(error) => Some(error),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, FetchOutcome::Found(_))
    }
}

impl From<Result<Option<Post>, FetchError>> for FetchOutcome {
    fn from(result: Result<Option<Post>, FetchError>) -> Self {
        match result {
            Ok(Some(post)) => FetchOutcome::Found(post),
            Ok(None) => FetchOutcome::NoPosts,
            Err(error) => FetchOutcome::Failed(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn sample_post() -> Post {
        Post::new(
            "vid1",
            Platform::YouTube,
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        )
        .with_author("Rust", "UC123")
        .with_content("Release notes")
        .with_url("https://www.youtube.com/watch?v=vid1")
        .with_media_urls(vec!["https://img.youtube.com/vi/vid1/maxresdefault.jpg".to_string()])
        .with_engagement("views", 10)
        .with_engagement("likes", 2)
    }

    #[test]
    fn test_platform_parsing_is_case_insensitive() {
        assert_eq!("YouTube".parse::<Platform>().unwrap(), Platform::YouTube);
        assert_eq!(" twitter ".parse::<Platform>().unwrap(), Platform::Twitter);
        assert_eq!("INSTAGRAM".parse::<Platform>().unwrap(), Platform::Instagram);

        let err = "myspace".parse::<Platform>().unwrap_err();
        assert_eq!(err, ParsePlatformError("myspace".to_string()));
        assert!(err.to_string().contains("youtube, twitter, instagram"));
    }

    #[test]
    fn test_platform_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Platform::YouTube).unwrap(), json!("youtube"));
        assert_eq!(Platform::Instagram.to_string(), "instagram");
        let parsed: Platform = serde_json::from_value(json!("twitter")).unwrap();
        assert_eq!(parsed, Platform::Twitter);
    }

    #[test]
    fn test_raw_response_is_never_serialized() {
        let post = sample_post().with_raw_response(json!({"secret": "payload"}));
        assert!(post.raw_response().is_some());

        let value = serde_json::to_value(&post).unwrap();
        assert!(value.get("raw").is_none());
        assert!(!value.to_string().contains("payload"));
        assert_eq!(value["platform"], "youtube");
        assert_eq!(value["engagement"]["views"], 10);
        assert_eq!(value["created_at"], "2024-03-01T12:00:00Z");
    }

    #[test]
    fn test_engagement_serialization_is_ordered() {
        let value = serde_json::to_string(&sample_post()).unwrap();
        let likes = value.find("\"likes\"").unwrap();
        let views = value.find("\"views\"").unwrap();
        assert!(likes < views);
        assert_eq!(sample_post().engagement_count("comments"), 0);
    }

    #[test]
    fn test_fetch_outcome_views() {
        let found = FetchOutcome::from(Ok(Some(sample_post())));
        assert!(found.is_found());
        assert_eq!(found.post().map(|p| p.id.as_str()), Some("vid1"));

        let empty = FetchOutcome::from(Ok(None));
        assert_eq!(empty, FetchOutcome::NoPosts);
        assert!(empty.into_post().is_none());

        let failed = FetchOutcome::from(Err(FetchError::ChannelNotFound("x".to_string())));
        assert!(failed.error().is_some());
        assert!(failed.post().is_none());
    }
}
