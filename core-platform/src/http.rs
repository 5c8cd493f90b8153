//! Resilient HTTP client
//!
//! Wraps a single-attempt [`HttpClient`] transport with a per-attempt
//! timeout, exponential backoff and rate-limit detection. Every platform
//! provider issues its upstream calls through this client.

use bridge_traits::error::BridgeError;
use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
use core_runtime::config::FetcherConfig;
use core_runtime::logging::redact_url;
use rand::Rng;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{FetchError, Result};

/// Characters of an error body kept in `FetchError::Api` messages
const ERROR_BODY_SNIPPET: usize = 200;

/// Retry and backoff tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry
    pub base_delay: Duration,
    /// Upper bound for any single delay
    pub max_delay: Duration,
    /// Draw each delay uniformly from `[0, capped delay]`
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            jitter: false,
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &FetcherConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: config.backoff_base,
            max_delay: config.backoff_max,
            jitter: config.jitter,
        }
    }

    /// Delay to wait after a failed attempt (0-based)
    ///
    /// `min(base_delay * 2^attempt, max_delay)`, optionally jittered.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        let capped = self
            .base_delay
            .checked_mul(factor)
            .map_or(self.max_delay, |delay| delay.min(self.max_delay));

        if self.jitter {
            let upper = u64::try_from(capped.as_millis()).unwrap_or(u64::MAX);
            Duration::from_millis(rand::thread_rng().gen_range(0..=upper))
        } else {
            capped
        }
    }
}

/// GET client with timeout, retry-with-backoff and 429 handling
///
/// | Outcome of an attempt | Behavior |
/// |---|---|
/// | 2xx | decode JSON body (malformed body: `Api`, no retry) |
/// | 429 | back off and retry; `RateLimited` once retries are exhausted |
/// | transport failure | back off and retry; `Api` once retries are exhausted |
/// | other status | `Api` with the status code, no retry |
#[derive(Clone)]
pub struct ResilientHttpClient {
    transport: Arc<dyn HttpClient>,
    timeout: Duration,
    policy: RetryPolicy,
}

impl ResilientHttpClient {
    pub fn new(transport: Arc<dyn HttpClient>, timeout: Duration, policy: RetryPolicy) -> Self {
        Self {
            transport,
            timeout,
            policy,
        }
    }

    pub fn from_config(transport: Arc<dyn HttpClient>, config: &FetcherConfig) -> Self {
        Self::new(
            transport,
            config.request_timeout,
            RetryPolicy::from_config(config),
        )
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// GET a JSON document
    pub async fn get(&self, request: HttpRequest) -> Result<serde_json::Value> {
        self.get_json(request).await
    }

    /// GET and deserialize a JSON document
    pub async fn get_json<T: DeserializeOwned>(&self, request: HttpRequest) -> Result<T> {
        let response = self.execute_with_retry(request).await?;

        response.json::<T>().map_err(|e| FetchError::Api {
            status: Some(response.status),
            message: format!("Invalid JSON response: {}", e),
        })
    }

    async fn attempt(&self, request: &HttpRequest) -> std::result::Result<HttpResponse, BridgeError> {
        let mut request = request.clone();
        request.timeout = Some(self.timeout);

        match tokio::time::timeout(self.timeout, self.transport.execute(request)).await {
            Ok(result) => result,
            Err(_) => Err(BridgeError::Timeout),
        }
    }

    async fn execute_with_retry(&self, request: HttpRequest) -> Result<HttpResponse> {
        let url = redact_url(&request.url);
        let max_retries = self.policy.max_retries;
        let mut attempt = 0;

        loop {
            debug!(url = %url, attempt = attempt + 1, "Executing HTTP request");

            match self.attempt(&request).await {
                Ok(response) if response.is_success() => {
                    debug!(url = %url, status = response.status, "HTTP request succeeded");
                    return Ok(response);
                }
                Ok(response) if response.status == 429 => {
                    if attempt >= max_retries {
                        let retry_after_seconds = response
                            .header("retry-after")
                            .and_then(|v| v.trim().parse::<u64>().ok());
                        warn!(url = %url, attempts = attempt + 1, "Rate limit persisted past retry budget");
                        return Err(FetchError::RateLimited {
                            message: format!("Rate limit exceeded after {} retries", max_retries),
                            retry_after_seconds,
                        });
                    }

                    let delay = self.policy.backoff_delay(attempt);
                    warn!(
                        url = %url,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        "Rate limited, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Ok(response) => {
                    warn!(url = %url, status = response.status, "HTTP request failed");
                    return Err(FetchError::Api {
                        status: Some(response.status),
                        message: format!(
                            "HTTP {}: {}",
                            response.status,
                            response.text_snippet(ERROR_BODY_SNIPPET)
                        ),
                    });
                }
                Err(e) if !e.is_transient() => {
                    warn!(url = %url, error = %e, "HTTP request could not be sent");
                    return Err(FetchError::api(None, format!("Request failed: {}", e)));
                }
                Err(e) => {
                    if attempt >= max_retries {
                        warn!(url = %url, error = %e, "HTTP request failed after retries");
                        return Err(FetchError::api(
                            None,
                            format!("Request failed after {} retries: {}", max_retries, e),
                        ));
                    }

                    let delay = self.policy.backoff_delay(attempt);
                    warn!(
                        url = %url,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "HTTP request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
            }

            attempt += 1;
        }
    }
}
