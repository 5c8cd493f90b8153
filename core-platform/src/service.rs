//! Platform service abstraction

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{ChannelInfo, Platform, Post};

/// Capability set every platform provider implements
///
/// Implementations translate platform-native JSON into the shared data model
/// and only ever fail with [`FetchError`](crate::FetchError) kinds.
///
/// # Example
///
/// ```ignore
/// use core_platform::PlatformService;
///
/// let service: Arc<dyn PlatformService> = Arc::new(YouTubeService::new(client, api_key)?);
/// if let Some(post) = service.get_latest_post("@rustlang").await? {
///     println!("{}: {}", post.author, post.content);
/// }
/// ```
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// Platform this service talks to
    fn platform(&self) -> Platform;

    /// Resolve a channel identifier (ID, handle or name) to channel metadata
    ///
    /// # Errors
    ///
    /// `ChannelNotFound` when no lookup strategy matches; `RateLimited` or
    /// `Api` for upstream failures.
    async fn get_channel_info(&self, identifier: &str) -> Result<ChannelInfo>;

    /// Fetch the most recent post of a channel
    ///
    /// Returns `Ok(None)` when the channel exists but has no recent content.
    async fn get_latest_post(&self, identifier: &str) -> Result<Option<Post>>;

    /// Perform one cheap authenticated call; any failure yields `false`
    async fn validate_credentials(&self) -> bool;
}
