//! Error types of the REST facade

use axum::extract::rejection::JsonRejection;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use core_platform::{FetchError, ParsePlatformError};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// Startup failures
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] core_runtime::Error),

    #[error("Bootstrap failed: {0}")]
    Bootstrap(#[from] core_service::CoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Request failures, rendered as the JSON error envelope
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    InvalidPlatform(#[from] ParsePlatformError),

    #[error("Invalid request body: {0}")]
    BadRequest(String),

    #[error("The requested resource was not found")]
    RouteNotFound,
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Fetch(e) => match e {
                FetchError::ChannelNotFound(_) => StatusCode::NOT_FOUND,
                FetchError::Authentication(_) => StatusCode::UNAUTHORIZED,
                FetchError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
                FetchError::Api { .. } => StatusCode::BAD_GATEWAY,
                FetchError::UnsupportedPlatform { .. } => StatusCode::SERVICE_UNAVAILABLE,
                FetchError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::InvalidPlatform(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::RouteNotFound => StatusCode::NOT_FOUND,
        }
    }

    fn detail(&self) -> String {
        match self {
            ApiError::Fetch(FetchError::Internal(_)) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
    detail: String,
    status_code: u16,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let body = ErrorBody {
            success: false,
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            detail: self.detail(),
            status_code: status.as_u16(),
        };

        let mut response = (status, Json(body)).into_response();

        if let ApiError::Fetch(FetchError::RateLimited {
            retry_after_seconds: Some(seconds),
            ..
        }) = &self
        {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(*seconds));
        }

        response
    }
}
