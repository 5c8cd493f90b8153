//! # REST facade
//!
//! Exposes the [`SocialMediaFetcher`] over HTTP with `axum`.
//!
//! Routes (under the configurable prefix, `/api/v1` by default):
//! - `GET /health`
//! - `GET /posts/{platform}/{channel}/latest[?include_raw=true]`
//! - `POST /posts/latest/batch`
//! - `GET /channels/{platform}/{channel}`
//!
//! plus `GET /api` at the root.

pub mod config;
pub mod error;
pub mod middleware;
pub mod responses;
pub mod routes;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use core_runtime::config::FetcherConfig;
use core_service::SocialMediaFetcher;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

pub use config::ServerConfig;
pub use error::{ApiError, ServerError};

/// Shared state handed to every handler
pub struct AppState {
    pub fetcher: SocialMediaFetcher,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(fetcher: SocialMediaFetcher, config: ServerConfig) -> Self {
        Self { fetcher, config }
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = middleware::cors_layer(&state.config.cors_origins, state.config.allows_any_origin());
    let prefix = state.config.api_prefix.clone();

    let v1 = Router::new()
        .route("/health", get(routes::health::health_check))
        .route(
            "/posts/{platform}/{channel}/latest",
            get(routes::posts::latest_post),
        )
        .route("/posts/latest/batch", post(routes::posts::latest_posts_batch))
        .route(
            "/channels/{platform}/{channel}",
            get(routes::channels::channel_info),
        );

    Router::new()
        .route("/api", get(routes::api_info))
        .nest(&prefix, v1)
        .fallback(routes::not_found)
        .with_state(Arc::new(state))
        .layer(axum::middleware::from_fn(middleware::process_time))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        )
}

/// Bootstrap the fetcher from the environment and serve until Ctrl-C
pub async fn serve(config: ServerConfig) -> Result<(), ServerError> {
    info!(
        app = %config.app_name,
        version = %config.app_version,
        debug = config.debug,
        "Starting server"
    );

    let fetcher_config = FetcherConfig::from_env()?;
    let fetcher = core_service::bootstrap(&fetcher_config)?;

    let addr = config.bind_address();
    let prefix = config.api_prefix.clone();
    let app = build_router(AppState::new(fetcher, config));

    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on http://{addr}{prefix}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
