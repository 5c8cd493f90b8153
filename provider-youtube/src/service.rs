//! YouTube Data API v3 service implementation

use async_trait::async_trait;
use bridge_traits::http::HttpRequest;
use core_platform::{
    ChannelInfo, FetchError, Platform, PlatformService, Post, ResilientHttpClient, Result,
};
use tracing::{debug, info, instrument};

use crate::types::{
    parse_count, ChannelListResponse, ChannelResource, SearchListResponse, SearchResult,
    VideoListResponse,
};

/// YouTube Data API base URL
const YOUTUBE_API_BASE: &str = "https://www.googleapis.com/youtube/v3";

const CHANNEL_PARTS: &str = "snippet,statistics";

/// YouTube Data API v3 service
///
/// # Channel resolution
///
/// Identifiers are tried in this order until one matches:
/// 1. channel ID (`channels?id=`)
/// 2. legacy username (`channels?forUsername=`)
/// 3. handle, only for identifiers starting with `@` (`channels?forHandle=`)
/// 4. free-text channel search followed by a lookup of the found ID
pub struct YouTubeService {
    client: ResilientHttpClient,
    api_key: String,
}

impl YouTubeService {
    /// Create a new YouTube service
    ///
    /// # Errors
    ///
    /// `FetchError::Authentication` when the API key is missing or blank.
    pub fn new(client: ResilientHttpClient, api_key: Option<String>) -> Result<Self> {
        let api_key = api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                FetchError::Authentication("YouTube API key not provided".to_string())
            })?;

        Ok(Self { client, api_key })
    }

    fn request(&self, resource: &str) -> HttpRequest {
        HttpRequest::get(format!("{}/{}", YOUTUBE_API_BASE, resource))
            .header("Accept", "application/json")
            .query("key", &self.api_key)
    }

    /// One `channels.list` lookup; an upstream "not found" counts as no match
    async fn find_channel(&self, param: &str, value: &str) -> Result<Option<ChannelResource>> {
        let request = self
            .request("channels")
            .query("part", CHANNEL_PARTS)
            .query(param, value);

        match self.client.get_json::<ChannelListResponse>(request).await {
            Ok(response) => Ok(response.items.into_iter().next()),
            Err(e) if e.is_lookup_miss() => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn search_channel_id(&self, query: &str) -> Result<Option<String>> {
        let request = self
            .request("search")
            .query("part", "snippet")
            .query("q", query)
            .query("type", "channel")
            .query("maxResults", "1");

        let response: SearchListResponse = self.client.get_json(request).await?;

        Ok(response
            .items
            .into_iter()
            .filter_map(|item| serde_json::from_value::<SearchResult>(item).ok())
            .find_map(|result| result.id.channel_id))
    }

    async fn resolve_channel(&self, identifier: &str) -> Result<ChannelResource> {
        let not_found =
            || FetchError::ChannelNotFound(format!("YouTube channel not found: {}", identifier));

        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(not_found());
        }

        if let Some(channel) = self.find_channel("id", identifier).await? {
            return Ok(channel);
        }

        if let Some(channel) = self.find_channel("forUsername", identifier).await? {
            return Ok(channel);
        }

        if identifier.starts_with('@') {
            if let Some(channel) = self.find_channel("forHandle", identifier).await? {
                return Ok(channel);
            }
        }

        debug!(identifier, "Falling back to channel search");
        if let Some(channel_id) = self.search_channel_id(identifier).await? {
            if let Some(channel) = self.find_channel("id", &channel_id).await? {
                return Ok(channel);
            }
        }

        Err(not_found())
    }

    fn convert_channel(channel: ChannelResource) -> ChannelInfo {
        let follower_count = parse_count(
            channel
                .statistics
                .as_ref()
                .and_then(|s| s.subscriber_count.as_deref()),
        );

        ChannelInfo {
            url: format!("https://www.youtube.com/channel/{}", channel.id),
            id: channel.id,
            name: channel.snippet.title,
            username: channel.snippet.custom_url,
            platform: Platform::YouTube,
            follower_count: Some(follower_count),
        }
    }
}

#[async_trait]
impl PlatformService for YouTubeService {
    fn platform(&self) -> Platform {
        Platform::YouTube
    }

    #[instrument(skip(self), fields(platform = "youtube"))]
    async fn get_channel_info(&self, identifier: &str) -> Result<ChannelInfo> {
        let channel = self.resolve_channel(identifier).await?;
        Ok(Self::convert_channel(channel))
    }

    #[instrument(skip(self), fields(platform = "youtube"))]
    async fn get_latest_post(&self, identifier: &str) -> Result<Option<Post>> {
        let channel = self.get_channel_info(identifier).await?;

        let request = self
            .request("search")
            .query("part", "snippet")
            .query("channelId", &channel.id)
            .query("type", "video")
            .query("order", "date")
            .query("maxResults", "1");

        let response: SearchListResponse = self.client.get_json(request).await?;

        let Some(raw) = response.items.into_iter().next() else {
            info!(channel_id = %channel.id, "Channel has no videos");
            return Ok(None);
        };

        let video: SearchResult = serde_json::from_value(raw.clone())
            .map_err(|e| FetchError::api(None, format!("Invalid search result: {}", e)))?;

        let video_id = video
            .id
            .video_id
            .ok_or_else(|| FetchError::api(None, "Search result has no videoId"))?;

        let details_request = self
            .request("videos")
            .query("part", "statistics,contentDetails")
            .query("id", &video_id);

        let details: VideoListResponse = self.client.get_json(details_request).await?;
        let stats = details
            .items
            .into_iter()
            .next()
            .map(|v| v.statistics)
            .unwrap_or_default();

        let snippet = video.snippet;
        let post = Post::new(video_id.as_str(), Platform::YouTube, snippet.published_at)
            .with_author(snippet.channel_title, snippet.channel_id)
            .with_content(snippet.title)
            .with_url(format!("https://www.youtube.com/watch?v={}", video_id))
            .with_media_urls(vec![format!(
                "https://img.youtube.com/vi/{}/maxresdefault.jpg",
                video_id
            )])
            .with_engagement("views", parse_count(stats.view_count.as_deref()))
            .with_engagement("likes", parse_count(stats.like_count.as_deref()))
            .with_engagement("comments", parse_count(stats.comment_count.as_deref()))
            .with_raw_response(raw);

        debug!(video_id = %post.id, "Fetched latest YouTube video");

        Ok(Some(post))
    }

    async fn validate_credentials(&self) -> bool {
        let request = self.request("i18nRegions").query("part", "snippet");
        self.client.get(request).await.is_ok()
    }
}
