//! Router behavior against stub platform services

use std::sync::Arc;

use api_server::{build_router, AppState, ServerConfig};
use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{TimeZone, Utc};
use core_platform::{ChannelInfo, FetchError, Platform, PlatformService, Post, Result};
use core_service::{ServiceRegistry, SocialMediaFetcher, WorkerPool};
use serde_json::{json, Value};
use tower::ServiceExt;

struct StubService {
    platform: Platform,
    latest: Result<Option<Post>>,
    channel: Result<ChannelInfo>,
}

impl StubService {
    fn new(platform: Platform) -> Self {
        Self {
            platform,
            latest: Ok(None),
            channel: Err(FetchError::ChannelNotFound("unknown".to_string())),
        }
    }

    fn latest(mut self, latest: Result<Option<Post>>) -> Self {
        self.latest = latest;
        self
    }

    fn channel(mut self, channel: Result<ChannelInfo>) -> Self {
        self.channel = channel;
        self
    }
}

#[async_trait]
impl PlatformService for StubService {
    fn platform(&self) -> Platform {
        self.platform
    }

    async fn get_channel_info(&self, _identifier: &str) -> Result<ChannelInfo> {
        self.channel.clone()
    }

    async fn get_latest_post(&self, _identifier: &str) -> Result<Option<Post>> {
        self.latest.clone()
    }

    async fn validate_credentials(&self) -> bool {
        true
    }
}

fn sample_post() -> Post {
    Post::new(
        "dQw4w9WgXcQ",
        Platform::YouTube,
        Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap(),
    )
    .with_author("Rust", "UC123")
    .with_content("Rust 1.75 release")
    .with_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
    .with_engagement("views", 1500)
    .with_raw_response(json!({"kind": "youtube#searchResult"}))
}

fn app(services: Vec<StubService>) -> Router {
    let registry = services
        .into_iter()
        .fold(ServiceRegistry::builder(), |builder, service| {
            builder.register(Arc::new(service))
        })
        .build();
    let fetcher = SocialMediaFetcher::new(registry, WorkerPool::new(2));
    build_router(AppState::new(fetcher, ServerConfig::default()))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, headers, body)
}

async fn get(app: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Value) {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, axum::http::HeaderMap, Value) {
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

#[tokio::test]
async fn test_health_lists_registered_platforms() {
    let app = app(vec![StubService::new(Platform::YouTube)]);

    let (status, headers, body) = get(app, "/api/v1/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["available_platforms"], json!(["youtube"]));
    assert!(body["timestamp"].is_string());

    let process_time: f64 = headers["x-process-time"].to_str().unwrap().parse().unwrap();
    assert!(process_time >= 0.0);
}

#[tokio::test]
async fn test_latest_post_hides_raw_payload_by_default() {
    let app = app(vec![
        StubService::new(Platform::YouTube).latest(Ok(Some(sample_post())))
    ]);

    let (status, _, body) = get(app, "/api/v1/posts/youtube/@rustlang/latest").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Post retrieved successfully");
    assert_eq!(body["data"]["id"], "dQw4w9WgXcQ");
    assert_eq!(body["data"]["platform"], "youtube");
    assert_eq!(body["data"]["engagement"]["views"], 1500);
    assert!(body["data"].get("raw_response").is_none());
}

#[tokio::test]
async fn test_latest_post_includes_raw_payload_on_request() {
    let app = app(vec![
        StubService::new(Platform::YouTube).latest(Ok(Some(sample_post())))
    ]);

    let (status, _, body) = get(app, "/api/v1/posts/YouTube/UC123/latest?include_raw=true").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["raw_response"]["kind"], "youtube#searchResult");
}

#[tokio::test]
async fn test_no_posts_yields_null_data() {
    let app = app(vec![StubService::new(Platform::Twitter)]);

    let (status, _, body) = get(app, "/api/v1/posts/twitter/rustlang/latest").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"], Value::Null);
    assert_eq!(body["message"], "No posts found for this channel");
}

#[tokio::test]
async fn test_invalid_platform_is_bad_request() {
    let app = app(vec![StubService::new(Platform::YouTube)]);

    let (status, _, body) = get(app, "/api/v1/posts/myspace/tom/latest").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["status_code"], 400);
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.contains("youtube, twitter, instagram"));
}

#[tokio::test]
async fn test_unregistered_platform_is_service_unavailable() {
    let app = app(vec![StubService::new(Platform::YouTube)]);

    let (status, _, body) = get(app, "/api/v1/posts/instagram/someone/latest").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        body["detail"],
        "Platform 'instagram' not supported. Available platforms: [youtube]"
    );
}

#[tokio::test]
async fn test_fetch_errors_map_to_status_codes() {
    let cases = [
        (FetchError::ChannelNotFound("ghost".into()), StatusCode::NOT_FOUND),
        (FetchError::Authentication("bad token".into()), StatusCode::UNAUTHORIZED),
        (FetchError::api(Some(500), "HTTP 500: boom"), StatusCode::BAD_GATEWAY),
        (FetchError::Internal("panicked".into()), StatusCode::INTERNAL_SERVER_ERROR),
    ];

    for (error, expected) in cases {
        let app = app(vec![StubService::new(Platform::Twitter).latest(Err(error))]);
        let (status, _, body) = get(app, "/api/v1/posts/twitter/rustlang/latest").await;

        assert_eq!(status, expected);
        assert_eq!(body["status_code"], expected.as_u16());
        assert_eq!(body["success"], false);
    }
}

#[tokio::test]
async fn test_rate_limited_sets_retry_after() {
    let app = app(vec![StubService::new(Platform::Twitter).latest(Err(
        FetchError::RateLimited {
            message: "Rate limit exceeded after 3 retries".into(),
            retry_after_seconds: Some(60),
        },
    ))]);

    let (status, headers, body) = get(app, "/api/v1/posts/twitter/rustlang/latest").await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(headers[header::RETRY_AFTER], "60");
    assert_eq!(body["error"], "Too Many Requests");
}

#[tokio::test]
async fn test_channel_info() {
    let info = ChannelInfo {
        id: "UC123".into(),
        name: "Rust".into(),
        username: Some("@rustlang".into()),
        platform: Platform::YouTube,
        url: "https://www.youtube.com/channel/UC123".into(),
        follower_count: Some(42_000),
    };
    let app = app(vec![StubService::new(Platform::YouTube).channel(Ok(info))]);

    let (status, _, body) = get(app, "/api/v1/channels/youtube/@rustlang").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], "UC123");
    assert_eq!(body["data"]["follower_count"], 42_000);
    assert_eq!(body["message"], "Channel information retrieved successfully");
}

#[tokio::test]
async fn test_channel_not_found() {
    let app = app(vec![StubService::new(Platform::YouTube)]);

    let (status, _, body) = get(app, "/api/v1/channels/youtube/nobody").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
}

#[tokio::test]
async fn test_batch_separates_posts_and_errors() {
    let app = app(vec![
        StubService::new(Platform::YouTube).latest(Ok(Some(sample_post()))),
        StubService::new(Platform::Twitter).latest(Err(FetchError::api(
            Some(503),
            "HTTP 503: unavailable",
        ))),
        StubService::new(Platform::Instagram),
    ]);

    let (status, _, body) = post_json(
        app,
        "/api/v1/posts/latest/batch",
        json!({"channels": {"youtube": "@rustlang", "twitter": "rustlang", "instagram": "rustlang"}}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Retrieved posts from 1 out of 3 platforms");
    assert_eq!(body["data"]["youtube"]["id"], "dQw4w9WgXcQ");
    assert!(body["data"]["youtube"].get("raw_response").is_none());
    assert_eq!(body["errors"]["twitter"], "API error: HTTP 503: unavailable");
    assert_eq!(body["errors"]["instagram"], "No posts found for this channel");
}

#[tokio::test]
async fn test_batch_rejects_unknown_platform() {
    let app = app(vec![StubService::new(Platform::YouTube)]);

    let (status, _, body) = post_json(
        app,
        "/api/v1/posts/latest/batch",
        json!({"channels": {"myspace": "tom"}}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status_code"], 400);
}

#[tokio::test]
async fn test_batch_rejects_duplicate_platform() {
    let app = app(vec![StubService::new(Platform::YouTube)]);

    let (status, _, body) = post_json(
        app,
        "/api/v1/posts/latest/batch",
        json!({"channels": {"YouTube": "rustlang", "youtube": "tokio-rs"}}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status_code"], 400);
    assert!(body["detail"].as_str().unwrap().contains("Duplicate platform"));
}

#[tokio::test]
async fn test_batch_rejects_malformed_body() {
    let app = app(vec![StubService::new(Platform::YouTube)]);

    let (status, _, body) = post_json(app, "/api/v1/posts/latest/batch", json!({"feeds": []})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_api_info() {
    let app = app(vec![]);

    let (status, _, body) = get(app, "/api").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Social Media API");
    assert_eq!(body["health_check"], "/api/v1/health");
}

#[tokio::test]
async fn test_unknown_route_uses_error_envelope() {
    let app = app(vec![]);

    let (status, headers, body) = get(app, "/api/v1/nothing/here").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert!(headers.contains_key("x-process-time"));
}
