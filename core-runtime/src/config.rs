//! # Fetcher Configuration Module
//!
//! Provides configuration management for the social media fetcher.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a
//! [`FetcherConfig`] holding the resilient-client tuning, the worker-pool size
//! and the per-platform credentials. It enforces fail-fast validation so that
//! an unusable configuration is rejected before any provider is built.
//!
//! Credentials are optional: a platform whose credential is missing is simply
//! left out of the service registry at bootstrap.
//!
//! ## Usage
//!
//! ### From the environment
//!
//! ```ignore
//! use core_runtime::config::FetcherConfig;
//!
//! let config = FetcherConfig::from_env()?;
//! ```
//!
//! ### Programmatic
//!
//! ```
//! use core_runtime::config::{FetcherConfig, PlatformCredentials};
//! use std::time::Duration;
//!
//! let config = FetcherConfig::builder()
//!     .request_timeout(Duration::from_secs(10))
//!     .max_retries(2)
//!     .worker_pool_size(8)
//!     .credentials(PlatformCredentials::default().with_youtube_api_key("key"))
//!     .build()
//!     .expect("valid config");
//!
//! assert!(config.credentials.has_youtube());
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | `REQUEST_TIMEOUT` | per-attempt timeout in seconds | 30 |
//! | `MAX_RETRIES` | retries after the first attempt | 3 |
//! | `RETRY_BACKOFF_MS` | backoff base delay | 1000 |
//! | `RETRY_MAX_BACKOFF_MS` | backoff cap | 60000 |
//! | `RETRY_JITTER` | full jitter on/off | false |
//! | `WORKER_POOL_SIZE` | concurrent platform calls | 4 |
//! | `YOUTUBE_API_KEY` | YouTube Data API key | unset |
//! | `TWITTER_BEARER_TOKEN` | X API v2 bearer token | unset |
//! | `INSTAGRAM_ACCESS_TOKEN` | Instagram Graph access token | unset |

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_BACKOFF_BASE: Duration = Duration::from_secs(1);
pub const DEFAULT_BACKOFF_MAX: Duration = Duration::from_secs(60);
pub const DEFAULT_WORKER_POOL_SIZE: usize = 4;

const MAX_REQUEST_TIMEOUT: Duration = Duration::from_secs(300);
const MAX_RETRIES_LIMIT: u32 = 10;
const MAX_WORKER_POOL_SIZE: usize = 64;

/// Credentials for each upstream platform.
///
/// Blank strings are treated the same as absent values.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PlatformCredentials {
    pub youtube_api_key: Option<String>,
    pub twitter_bearer_token: Option<String>,
    pub instagram_access_token: Option<String>,
}

impl PlatformCredentials {
    pub fn with_youtube_api_key(mut self, key: impl Into<String>) -> Self {
        self.youtube_api_key = non_blank(key.into());
        self
    }

    pub fn with_twitter_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.twitter_bearer_token = non_blank(token.into());
        self
    }

    pub fn with_instagram_access_token(mut self, token: impl Into<String>) -> Self {
        self.instagram_access_token = non_blank(token.into());
        self
    }

    pub fn has_youtube(&self) -> bool {
        is_present(&self.youtube_api_key)
    }

    pub fn has_twitter(&self) -> bool {
        is_present(&self.twitter_bearer_token)
    }

    pub fn has_instagram(&self) -> bool {
        is_present(&self.instagram_access_token)
    }
}

impl fmt::Debug for PlatformCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn mask(value: &Option<String>) -> Option<&'static str> {
            value.as_ref().map(|_| "[REDACTED]")
        }

        f.debug_struct("PlatformCredentials")
            .field("youtube_api_key", &mask(&self.youtube_api_key))
            .field("twitter_bearer_token", &mask(&self.twitter_bearer_token))
            .field("instagram_access_token", &mask(&self.instagram_access_token))
            .finish()
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn is_present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

/// Fetcher configuration.
///
/// Use [`FetcherConfigBuilder`] (via [`FetcherConfig::builder`]) or
/// [`FetcherConfig::from_env`] to construct instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetcherConfig {
    /// Timeout applied to every individual HTTP attempt
    pub request_timeout: Duration,

    /// Retries after the first attempt for 429s and transport failures
    pub max_retries: u32,

    /// Backoff delay before the first retry; doubles on each retry
    pub backoff_base: Duration,

    /// Upper bound for a single backoff delay
    pub backoff_max: Duration,

    /// Draw each delay uniformly from `[0, capped delay]`
    pub jitter: bool,

    /// Maximum number of platform calls running at once
    pub worker_pool_size: usize,

    pub credentials: PlatformCredentials,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_base: DEFAULT_BACKOFF_BASE,
            backoff_max: DEFAULT_BACKOFF_MAX,
            jitter: false,
            worker_pool_size: DEFAULT_WORKER_POOL_SIZE,
            credentials: PlatformCredentials::default(),
        }
    }
}

impl FetcherConfig {
    /// Creates a new builder for constructing a `FetcherConfig`.
    pub fn builder() -> FetcherConfigBuilder {
        FetcherConfigBuilder::default()
    }

    /// Load configuration from process environment variables.
    ///
    /// Call `dotenvy::dotenv()` beforehand to pick up a `.env` file.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Unset or blank numeric variables fall back to their defaults;
    /// unparsable values are rejected.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).and_then(non_blank);

        let mut builder = FetcherConfig::builder();

        if let Some(secs) = parse_var::<u64>(&var, "REQUEST_TIMEOUT")? {
            builder = builder.request_timeout(Duration::from_secs(secs));
        }
        if let Some(retries) = parse_var::<u32>(&var, "MAX_RETRIES")? {
            builder = builder.max_retries(retries);
        }
        if let Some(ms) = parse_var::<u64>(&var, "RETRY_BACKOFF_MS")? {
            builder = builder.backoff_base(Duration::from_millis(ms));
        }
        if let Some(ms) = parse_var::<u64>(&var, "RETRY_MAX_BACKOFF_MS")? {
            builder = builder.backoff_max(Duration::from_millis(ms));
        }
        if let Some(raw) = var("RETRY_JITTER") {
            builder = builder.jitter(parse_bool("RETRY_JITTER", &raw)?);
        }
        if let Some(size) = parse_var::<usize>(&var, "WORKER_POOL_SIZE")? {
            builder = builder.worker_pool_size(size);
        }

        let credentials = PlatformCredentials {
            youtube_api_key: var("YOUTUBE_API_KEY"),
            twitter_bearer_token: var("TWITTER_BEARER_TOKEN"),
            instagram_access_token: var("INSTAGRAM_ACCESS_TOKEN"),
        };

        builder.credentials(credentials).build()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Request timeout is in (0, 300] seconds
    /// - Max retries does not exceed 10
    /// - Worker pool size is in [1, 64]
    /// - Backoff base is non-zero and not above the cap
    pub fn validate(&self) -> Result<()> {
        if self.request_timeout.is_zero() {
            return Err(Error::Config(
                "Request timeout must be greater than 0 seconds".to_string(),
            ));
        }

        if self.request_timeout > MAX_REQUEST_TIMEOUT {
            return Err(Error::Config(format!(
                "Request timeout exceeds maximum of {} seconds",
                MAX_REQUEST_TIMEOUT.as_secs()
            )));
        }

        if self.max_retries > MAX_RETRIES_LIMIT {
            return Err(Error::Config(format!(
                "Max retries exceeds maximum of {}",
                MAX_RETRIES_LIMIT
            )));
        }

        if self.worker_pool_size == 0 || self.worker_pool_size > MAX_WORKER_POOL_SIZE {
            return Err(Error::Config(format!(
                "Worker pool size must be between 1 and {}",
                MAX_WORKER_POOL_SIZE
            )));
        }

        if self.backoff_base.is_zero() {
            return Err(Error::Config(
                "Retry backoff must be greater than 0ms".to_string(),
            ));
        }

        if self.backoff_max < self.backoff_base {
            return Err(Error::Config(
                "Retry backoff cap must not be lower than the base delay".to_string(),
            ));
        }

        Ok(())
    }
}

fn parse_var<T>(var: &impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    var(name)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| Error::Config(format!("Invalid value for {}: '{}' ({})", name, raw, e)))
        })
        .transpose()
}

/// Parse a boolean flag value (`1/0`, `true/false`, `yes/no`, `on/off`).
pub fn parse_bool(name: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::Config(format!(
            "Invalid value for {}: '{}' (expected a boolean)",
            name, raw
        ))),
    }
}

/// Builder for constructing [`FetcherConfig`] instances.
///
/// Unset values keep their defaults; [`build()`](FetcherConfigBuilder::build)
/// validates the result.
#[derive(Debug, Default)]
pub struct FetcherConfigBuilder {
    request_timeout: Option<Duration>,
    max_retries: Option<u32>,
    backoff_base: Option<Duration>,
    backoff_max: Option<Duration>,
    jitter: Option<bool>,
    worker_pool_size: Option<usize>,
    credentials: Option<PlatformCredentials>,
}

impl FetcherConfigBuilder {
    /// Sets the per-attempt request timeout.
    ///
    /// Default: 30 seconds
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Sets how many times a failed request is retried.
    ///
    /// Default: 3
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Sets the delay before the first retry.
    ///
    /// Default: 1 second
    pub fn backoff_base(mut self, delay: Duration) -> Self {
        self.backoff_base = Some(delay);
        self
    }

    /// Sets the maximum delay between retries.
    ///
    /// Default: 60 seconds
    pub fn backoff_max(mut self, delay: Duration) -> Self {
        self.backoff_max = Some(delay);
        self
    }

    /// Enables or disables full jitter.
    ///
    /// Default: false
    pub fn jitter(mut self, enabled: bool) -> Self {
        self.jitter = Some(enabled);
        self
    }

    /// Sets the number of concurrent platform calls.
    ///
    /// Default: 4
    pub fn worker_pool_size(mut self, size: usize) -> Self {
        self.worker_pool_size = Some(size);
        self
    }

    pub fn credentials(mut self, credentials: PlatformCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Builds the final `FetcherConfig` instance.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` when a value is out of range.
    pub fn build(self) -> Result<FetcherConfig> {
        let defaults = FetcherConfig::default();

        let config = FetcherConfig {
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            max_retries: self.max_retries.unwrap_or(defaults.max_retries),
            backoff_base: self.backoff_base.unwrap_or(defaults.backoff_base),
            backoff_max: self.backoff_max.unwrap_or(defaults.backoff_max),
            jitter: self.jitter.unwrap_or(defaults.jitter),
            worker_pool_size: self.worker_pool_size.unwrap_or(defaults.worker_pool_size),
            credentials: self.credentials.unwrap_or_default(),
        };

        config.validate()?;

        Ok(config)
    }
}
