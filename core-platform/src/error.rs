//! Error taxonomy shared by every platform provider

use thiserror::Error;

use crate::models::Platform;

/// Errors surfaced by platform services and the fetch orchestrator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Credentials are missing or were rejected
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// No lookup strategy matched the channel identifier
    #[error("Channel not found: {0}")]
    ChannelNotFound(String),

    /// Upstream kept answering 429 past the retry budget
    #[error("Rate limit exceeded: {message}")]
    RateLimited {
        message: String,
        retry_after_seconds: Option<u64>,
    },

    /// Any other upstream failure
    #[error("API error: {message}")]
    Api {
        status: Option<u16>,
        message: String,
    },

    /// Requested platform has no registered service
    #[error(
        "Platform '{platform}' not supported. Available platforms: [{}]",
        join_platforms(.available)
    )]
    UnsupportedPlatform {
        platform: Platform,
        available: Vec<Platform>,
    },

    /// Unexpected failure, e.g. a worker task that panicked
    #[error("Unexpected error: {0}")]
    Internal(String),
}

impl FetchError {
    pub fn api(status: Option<u16>, message: impl Into<String>) -> Self {
        FetchError::Api {
            status,
            message: message.into(),
        }
    }

    /// True for upstream answers that mean "no such resource" rather than a
    /// failure: lookup strategies fall through to the next one on these.
    pub fn is_lookup_miss(&self) -> bool {
        matches!(
            self,
            FetchError::Api {
                status: Some(400 | 404),
                ..
            }
        )
    }
}

fn join_platforms(platforms: &[Platform]) -> String {
    platforms
        .iter()
        .map(Platform::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, FetchError>;
