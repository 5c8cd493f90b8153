//! Instagram Graph API service implementation

use async_trait::async_trait;
use bridge_traits::http::HttpRequest;
use core_platform::{
    ChannelInfo, FetchError, Platform, PlatformService, Post, ResilientHttpClient, Result,
};
use tracing::{debug, info, instrument};

use crate::types::{parse_timestamp, IgMedia, IgUser, MediaListResponse};

/// Instagram Graph API base URL
const INSTAGRAM_API_BASE: &str = "https://graph.instagram.com";

const USER_FIELDS: &str = "id,username";

const MEDIA_FIELDS: &str =
    "id,caption,media_type,media_url,permalink,thumbnail_url,timestamp,like_count,comments_count";

/// Instagram Graph API service
///
/// # Account resolution
///
/// 1. `me` / `self`: the token owner
/// 2. all-digit identifiers: the user node with that ID
/// 3. anything else: the token owner, if its username matches
pub struct InstagramService {
    client: ResilientHttpClient,
    access_token: String,
}

impl InstagramService {
    /// Create a new Instagram service
    ///
    /// # Errors
    ///
    /// `FetchError::Authentication` when the access token is missing or blank.
    pub fn new(client: ResilientHttpClient, access_token: Option<String>) -> Result<Self> {
        let access_token = access_token
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                FetchError::Authentication("Instagram access token not provided".to_string())
            })?;

        Ok(Self {
            client,
            access_token,
        })
    }

    fn request(&self, path: &str) -> HttpRequest {
        HttpRequest::get(format!("{}/{}", INSTAGRAM_API_BASE, path))
            .query("access_token", &self.access_token)
    }

    /// Fetch a user node by ID; any upstream 4xx counts as no match
    async fn fetch_user(&self, node: &str) -> Result<Option<IgUser>> {
        let request = self.request(node).query("fields", USER_FIELDS);

        match self.client.get_json::<IgUser>(request).await {
            Ok(user) => Ok(Some(user)),
            Err(FetchError::Api {
                status: Some(status),
                ..
            }) if (400..500).contains(&status) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Fetch the token owner; a rejected token is an authentication failure
    async fn fetch_owner(&self) -> Result<IgUser> {
        let request = self.request("me").query("fields", USER_FIELDS);

        self.client
            .get_json::<IgUser>(request)
            .await
            .map_err(|e| match e {
                FetchError::Api { status, message } if is_token_rejection(status, &message) => {
                    FetchError::Authentication(format!("Instagram access token rejected: {}", message))
                }
                other => other,
            })
    }

    async fn resolve_user(&self, identifier: &str) -> Result<IgUser> {
        let not_found =
            || FetchError::ChannelNotFound(format!("Instagram account not found: {}", identifier));

        let wanted = identifier.trim().trim_start_matches('@');
        if wanted.is_empty() {
            return Err(not_found());
        }

        if wanted.eq_ignore_ascii_case("me") || wanted.eq_ignore_ascii_case("self") {
            return self.fetch_owner().await;
        }

        if wanted.chars().all(|c| c.is_ascii_digit()) {
            if let Some(user) = self.fetch_user(wanted).await? {
                return Ok(user);
            }
        }

        let owner = self.fetch_owner().await?;
        if owner
            .username
            .as_deref()
            .is_some_and(|name| name.eq_ignore_ascii_case(wanted))
        {
            Ok(owner)
        } else {
            Err(not_found())
        }
    }

    fn convert_user(user: IgUser) -> ChannelInfo {
        let username = user.username.unwrap_or_else(|| user.id.clone());

        ChannelInfo {
            url: format!("https://www.instagram.com/{}/", username),
            id: user.id,
            name: username.clone(),
            username: Some(username),
            platform: Platform::Instagram,
            follower_count: None,
        }
    }

    fn convert_media(media: IgMedia, account: &ChannelInfo) -> Result<Post> {
        let created_at = parse_timestamp(&media.timestamp).ok_or_else(|| {
            FetchError::api(None, format!("Invalid media timestamp: {}", media.timestamp))
        })?;

        let media_urls: Vec<String> = [media.media_url, media.thumbnail_url]
            .into_iter()
            .flatten()
            .collect();

        let mut post = Post::new(media.id.as_str(), Platform::Instagram, created_at)
            .with_author(account.name.as_str(), account.id.as_str())
            .with_content(media.caption.unwrap_or_default())
            .with_url(media.permalink.unwrap_or_else(|| account.url.clone()))
            .with_media_urls(media_urls);

        if let Some(likes) = media.like_count {
            post = post.with_engagement("likes", likes);
        }
        if let Some(comments) = media.comments_count {
            post = post.with_engagement("comments", comments);
        }

        Ok(post)
    }
}

/// 401/403, or the Graph API's OAuth error code 190 (invalid or expired token)
fn is_token_rejection(status: Option<u16>, message: &str) -> bool {
    match status {
        Some(401) | Some(403) => true,
        Some(400) => {
            let compact: String = message.chars().filter(|c| !c.is_whitespace()).collect();
            compact.contains("\"code\":190")
        }
        _ => false,
    }
}

#[async_trait]
impl PlatformService for InstagramService {
    fn platform(&self) -> Platform {
        Platform::Instagram
    }

    #[instrument(skip(self), fields(platform = "instagram"))]
    async fn get_channel_info(&self, identifier: &str) -> Result<ChannelInfo> {
        let user = self.resolve_user(identifier).await?;
        Ok(Self::convert_user(user))
    }

    #[instrument(skip(self), fields(platform = "instagram"))]
    async fn get_latest_post(&self, identifier: &str) -> Result<Option<Post>> {
        let account = self.get_channel_info(identifier).await?;

        let request = self
            .request(&format!("{}/media", account.id))
            .query("fields", MEDIA_FIELDS)
            .query("limit", "1");

        let response: MediaListResponse = self.client.get_json(request).await?;

        let Some(raw) = response.data.into_iter().next() else {
            info!(user_id = %account.id, "Account has no media");
            return Ok(None);
        };

        let media: IgMedia = serde_json::from_value(raw.clone())
            .map_err(|e| FetchError::api(None, format!("Invalid media payload: {}", e)))?;

        let post = Self::convert_media(media, &account)?.with_raw_response(raw);

        debug!(media_id = %post.id, "Fetched latest Instagram media");

        Ok(Some(post))
    }

    async fn validate_credentials(&self) -> bool {
        self.fetch_owner().await.is_ok()
    }
}
