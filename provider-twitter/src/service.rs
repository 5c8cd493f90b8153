//! X API v2 service implementation

use async_trait::async_trait;
use bridge_traits::http::HttpRequest;
use core_platform::{
    ChannelInfo, FetchError, Platform, PlatformService, Post, ResilientHttpClient, Result,
};
use tracing::{debug, info, instrument};

use crate::types::{TimelineResponse, Tweet, User, UserResponse};

/// X API v2 base URL
const TWITTER_API_BASE: &str = "https://api.twitter.com/2";

const USER_FIELDS: &str = "public_metrics,description,url";

/// Recent tweets requested per timeline call; the API minimum is 5
const TIMELINE_PAGE_SIZE: &str = "5";

/// Account used for the credential check
const CREDENTIAL_PROBE_USERNAME: &str = "XDevelopers";

/// X (Twitter) API v2 service
pub struct TwitterService {
    client: ResilientHttpClient,
    bearer_token: String,
}

impl TwitterService {
    /// Create a new X service
    ///
    /// # Errors
    ///
    /// `FetchError::Authentication` when the bearer token is missing or blank.
    pub fn new(client: ResilientHttpClient, bearer_token: Option<String>) -> Result<Self> {
        let bearer_token = bearer_token
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                FetchError::Authentication("Twitter Bearer token not provided".to_string())
            })?;

        Ok(Self {
            client,
            bearer_token,
        })
    }

    fn request(&self, path: &str) -> HttpRequest {
        HttpRequest::get(format!("{}/{}", TWITTER_API_BASE, path))
            .bearer_token(&self.bearer_token)
    }

    async fn lookup_user(&self, path: String) -> Result<Option<User>> {
        let request = self.request(&path).query("user.fields", USER_FIELDS);

        match self.client.get_json::<UserResponse>(request).await {
            Ok(response) => Ok(response.data),
            Err(e) if e.is_lookup_miss() => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn resolve_user(&self, identifier: &str) -> Result<User> {
        let username = identifier.trim().trim_start_matches('@');
        if username.is_empty() {
            return Err(Self::not_found(identifier));
        }

        if username.chars().all(|c| c.is_ascii_digit()) {
            if let Some(user) = self.lookup_user(format!("users/{}", username)).await? {
                return Ok(user);
            }
        }

        let path = format!("users/by/username/{}", urlencoding::encode(username));
        self.lookup_user(path)
            .await?
            .ok_or_else(|| Self::not_found(identifier))
    }

    fn not_found(identifier: &str) -> FetchError {
        FetchError::ChannelNotFound(format!("Twitter account not found: {}", identifier))
    }

    fn convert_user(user: User) -> ChannelInfo {
        ChannelInfo {
            url: format!("https://twitter.com/{}", user.username),
            follower_count: Some(
                user.public_metrics
                    .map(|m| m.followers_count)
                    .unwrap_or_default(),
            ),
            id: user.id,
            name: user.name,
            username: Some(user.username),
            platform: Platform::Twitter,
        }
    }
}

#[async_trait]
impl PlatformService for TwitterService {
    fn platform(&self) -> Platform {
        Platform::Twitter
    }

    #[instrument(skip(self), fields(platform = "twitter"))]
    async fn get_channel_info(&self, identifier: &str) -> Result<ChannelInfo> {
        let user = self.resolve_user(identifier).await?;
        Ok(Self::convert_user(user))
    }

    #[instrument(skip(self), fields(platform = "twitter"))]
    async fn get_latest_post(&self, identifier: &str) -> Result<Option<Post>> {
        let account = self.get_channel_info(identifier).await?;

        let request = self
            .request(&format!("users/{}/tweets", account.id))
            .query("max_results", TIMELINE_PAGE_SIZE)
            .query("tweet.fields", "created_at,public_metrics,attachments")
            .query("expansions", "attachments.media_keys")
            .query("media.fields", "url,preview_image_url");

        let timeline: TimelineResponse = self.client.get_json(request).await?;

        let Some(raw) = timeline.data.into_iter().next() else {
            info!(user_id = %account.id, "Account has no recent tweets");
            return Ok(None);
        };

        let tweet: Tweet = serde_json::from_value(raw.clone())
            .map_err(|e| FetchError::api(None, format!("Invalid tweet payload: {}", e)))?;

        let media_urls: Vec<String> = tweet
            .attachments
            .as_ref()
            .map(|a| a.media_keys.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|key| {
                timeline
                    .includes
                    .media
                    .iter()
                    .find(|m| &m.media_key == key)
                    .and_then(|m| m.best_url())
                    .map(str::to_string)
            })
            .collect();

        let username = account.username.as_deref().unwrap_or_default();
        let metrics = &tweet.public_metrics;

        let post = Post::new(tweet.id.as_str(), Platform::Twitter, tweet.created_at)
            .with_author(account.name.as_str(), account.id.as_str())
            .with_content(tweet.text.as_str())
            .with_url(format!("https://twitter.com/{}/status/{}", username, tweet.id))
            .with_media_urls(media_urls)
            .with_engagement("likes", metrics.like_count)
            .with_engagement("retweets", metrics.retweet_count)
            .with_engagement("replies", metrics.reply_count)
            .with_engagement("quotes", metrics.quote_count)
            .with_raw_response(raw);

        debug!(tweet_id = %post.id, "Fetched latest tweet");

        Ok(Some(post))
    }

    async fn validate_credentials(&self) -> bool {
        let path = format!("users/by/username/{}", CREDENTIAL_PROBE_USERNAME);
        matches!(self.lookup_user(path).await, Ok(Some(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::http::{HttpClient, HttpResponse};
    use core_platform::RetryPolicy;
    use mockall::mock;
    use std::sync::Arc;
    use std::time::Duration;

    mock! {
        HttpClient {}

        #[async_trait]
        impl HttpClient for HttpClient {
            async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
        }
    }

    const USER: &str = r#"{
        "data": {
            "id": "2244994945",
            "name": "Developers",
            "username": "XDevelopers",
            "public_metrics": {"followers_count": 570000, "following_count": 2000}
        }
    }"#;

    const TIMELINE: &str = r#"{
        "data": [
            {
                "id": "1790000000000000001",
                "text": "New API docs are live",
                "created_at": "2024-05-13T17:00:00.000Z",
                "public_metrics": {"like_count": 120, "retweet_count": 30, "reply_count": 8, "quote_count": 2},
                "attachments": {"media_keys": ["3_1", "7_2"]}
            },
            {
                "id": "1780000000000000000",
                "text": "Older tweet",
                "created_at": "2024-05-01T10:00:00.000Z"
            }
        ],
        "includes": {
            "media": [
                {"media_key": "7_2", "type": "video", "preview_image_url": "https://pbs.twimg.com/preview.jpg"},
                {"media_key": "3_1", "type": "photo", "url": "https://pbs.twimg.com/photo.jpg"}
            ]
        }
    }"#;

    fn service(mock: MockHttpClient) -> TwitterService {
        let client = ResilientHttpClient::new(
            Arc::new(mock),
            Duration::from_secs(30),
            RetryPolicy {
                max_retries: 0,
                ..RetryPolicy::default()
            },
        );
        TwitterService::new(client, Some("bearer".to_string())).unwrap()
    }

    fn path(request: &HttpRequest) -> &str {
        request
            .url
            .strip_prefix(TWITTER_API_BASE)
            .unwrap_or(&request.url)
    }

    fn json(body: &'static str) -> BridgeResult<HttpResponse> {
        Ok(HttpResponse::new(200, body))
    }

    #[test]
    fn test_new_requires_bearer_token() {
        let client = ResilientHttpClient::new(
            Arc::new(MockHttpClient::new()),
            Duration::from_secs(30),
            RetryPolicy::default(),
        );

        let err = TwitterService::new(client, Some(String::new())).err().unwrap();
        assert!(matches!(err, FetchError::Authentication(_)));
    }

    #[tokio::test]
    async fn test_get_channel_info_strips_at_sign() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .withf(|r| {
                path(r) == "/users/by/username/XDevelopers"
                    && r.headers.get("Authorization").map(String::as_str) == Some("Bearer bearer")
                    && r.query_param("user.fields") == Some(USER_FIELDS)
            })
            .times(1)
            .returning(|_| json(USER));

        let info = service(mock_http)
            .get_channel_info("@XDevelopers")
            .await
            .unwrap();

        assert_eq!(info.id, "2244994945");
        assert_eq!(info.name, "Developers");
        assert_eq!(info.username.as_deref(), Some("XDevelopers"));
        assert_eq!(info.platform, Platform::Twitter);
        assert_eq!(info.url, "https://twitter.com/XDevelopers");
        assert_eq!(info.follower_count, Some(570000));
    }

    #[tokio::test]
    async fn test_get_channel_info_numeric_id() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .withf(|r| path(r) == "/users/2244994945")
            .times(1)
            .returning(|_| json(USER));

        let info = service(mock_http)
            .get_channel_info("2244994945")
            .await
            .unwrap();

        assert_eq!(info.username.as_deref(), Some("XDevelopers"));
    }

    #[tokio::test]
    async fn test_get_channel_info_not_found() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(1).returning(|_| {
            json(r#"{"errors": [{"title": "Not Found Error", "detail": "Could not find user with username: [ghost]."}]}"#)
        });

        let err = service(mock_http).get_channel_info("ghost").await.unwrap_err();

        assert!(matches!(err, FetchError::ChannelNotFound(_)));
    }

    #[tokio::test]
    async fn test_get_channel_info_invalid_username_is_not_found() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| Ok(HttpResponse::new(400, r#"{"title": "Invalid Request"}"#)));

        let err = service(mock_http)
            .get_channel_info("not a valid name")
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::ChannelNotFound(_)));
    }

    #[tokio::test]
    async fn test_get_latest_post_resolves_media() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().returning(|r| match path(&r) {
            "/users/by/username/XDevelopers" => json(USER),
            "/users/2244994945/tweets" => {
                assert_eq!(r.query_param("max_results"), Some("5"));
                assert_eq!(r.query_param("expansions"), Some("attachments.media_keys"));
                json(TIMELINE)
            }
            other => panic!("unexpected path {}", other),
        });

        let post = service(mock_http)
            .get_latest_post("XDevelopers")
            .await
            .unwrap()
            .expect("a tweet");

        assert_eq!(post.id, "1790000000000000001");
        assert_eq!(post.platform, Platform::Twitter);
        assert_eq!(post.author, "Developers");
        assert_eq!(post.author_id, "2244994945");
        assert_eq!(post.content, "New API docs are live");
        assert_eq!(
            post.url,
            "https://twitter.com/XDevelopers/status/1790000000000000001"
        );
        assert_eq!(
            post.media_urls,
            vec![
                "https://pbs.twimg.com/photo.jpg".to_string(),
                "https://pbs.twimg.com/preview.jpg".to_string()
            ]
        );
        assert_eq!(post.engagement_count("likes"), 120);
        assert_eq!(post.engagement_count("retweets"), 30);
        assert_eq!(post.engagement_count("replies"), 8);
        assert_eq!(post.engagement_count("quotes"), 2);
        assert!(post.raw_response().is_some());
    }

    #[tokio::test]
    async fn test_get_latest_post_without_tweets() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().returning(|r| {
            if path(&r).ends_with("/tweets") {
                json(r#"{"meta": {"result_count": 0}}"#)
            } else {
                json(USER)
            }
        });

        let post = service(mock_http).get_latest_post("XDevelopers").await.unwrap();
        assert!(post.is_none());
    }

    #[tokio::test]
    async fn test_get_latest_post_missing_metrics_default_to_zero() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().returning(|r| {
            if path(&r).ends_with("/tweets") {
                json(r#"{"data": [{"id": "1", "text": "hi", "created_at": "2024-01-01T00:00:00Z"}]}"#)
            } else {
                json(USER)
            }
        });

        let post = service(mock_http)
            .get_latest_post("XDevelopers")
            .await
            .unwrap()
            .unwrap();

        assert!(post.media_urls.is_empty());
        assert_eq!(post.engagement.get("likes"), Some(&0));
    }

    #[tokio::test]
    async fn test_validate_credentials() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .withf(|r| path(r) == "/users/by/username/XDevelopers")
            .returning(|_| json(USER));
        assert!(service(mock_http).validate_credentials().await);

        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .returning(|_| Ok(HttpResponse::new(401, "Unauthorized")));
        assert!(!service(mock_http).validate_credentials().await);
    }
}
