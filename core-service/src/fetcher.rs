//! Fetch orchestrator
//!
//! Routes requests to the registered [`PlatformService`] for a platform and
//! runs every upstream call on the bounded [`WorkerPool`].

use std::collections::HashMap;
use std::sync::Arc;

use core_platform::{ChannelInfo, FetchError, FetchOutcome, Platform, PlatformService, Post, Result};
use futures::future::join_all;
use tokio::task::JoinHandle;
use tracing::{debug, error, instrument, warn};

use crate::pool::WorkerPool;
use crate::registry::ServiceRegistry;

/// Single entry point used by presentation layers
///
/// Cheap to clone; clones share the registry and the worker pool.
#[derive(Clone, Debug)]
pub struct SocialMediaFetcher {
    registry: Arc<ServiceRegistry>,
    pool: WorkerPool,
}

impl SocialMediaFetcher {
    pub fn new(registry: ServiceRegistry, pool: WorkerPool) -> Self {
        Self {
            registry: Arc::new(registry),
            pool,
        }
    }

    pub fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    /// Platforms with a registered service, in registration order
    pub fn available_platforms(&self) -> Vec<Platform> {
        self.registry.available_platforms()
    }

    /// Latest post of one channel
    ///
    /// # Errors
    ///
    /// `UnsupportedPlatform` when no service is registered for `platform`,
    /// otherwise whatever the provider reports.
    #[instrument(skip(self, platform), fields(platform = %platform))]
    pub async fn get_latest_post(&self, platform: Platform, identifier: &str) -> Result<Option<Post>> {
        let handle = self.dispatch_latest_post(platform, identifier)?;
        join(handle).await
    }

    /// Channel metadata for one channel
    #[instrument(skip(self, platform), fields(platform = %platform))]
    pub async fn get_channel_info(&self, platform: Platform, identifier: &str) -> Result<ChannelInfo> {
        let service = self.service(platform)?;
        let identifier = identifier.to_string();

        let handle = self
            .pool
            .submit(async move { service.get_channel_info(&identifier).await });

        join(handle).await
    }

    /// Latest post for several channels at once
    ///
    /// Every fetch is dispatched to the pool before any result is awaited.
    /// The result holds exactly one entry per requested platform; a failing
    /// platform never aborts the others.
    #[instrument(skip(self, channels), fields(requested = channels.len()))]
    pub async fn get_latest_posts_from_multiple_channels(
        &self,
        channels: HashMap<Platform, String>,
    ) -> HashMap<Platform, FetchOutcome> {
        let dispatched: Vec<_> = channels
            .into_iter()
            .map(|(platform, identifier)| {
                let handle = self.dispatch_latest_post(platform, &identifier);
                (platform, identifier, handle)
            })
            .collect();

        let results = join_all(dispatched.into_iter().map(
            |(platform, identifier, handle)| async move {
                let result = match handle {
                    Ok(handle) => join(handle).await,
                    Err(e) => Err(e),
                };
                (platform, identifier, result)
            },
        ))
        .await;

        results
            .into_iter()
            .map(|(platform, identifier, result)| {
                if let Err(e) = &result {
                    warn!(
                        platform = %platform,
                        identifier = %identifier,
                        error = %e,
                        "Failed to fetch latest post"
                    );
                }
                (platform, FetchOutcome::from(result))
            })
            .collect()
    }

    /// Credential check for every registered platform, in registration order
    pub async fn validate_credentials(&self) -> Vec<(Platform, bool)> {
        let handles: Vec<_> = self
            .registry
            .iter()
            .map(|(platform, service)| {
                let service = Arc::clone(service);
                (
                    platform,
                    self.pool
                        .submit(async move { service.validate_credentials().await }),
                )
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for (platform, handle) in handles {
            let valid = match handle.await {
                Ok(valid) => valid,
                Err(e) => {
                    error!(platform = %platform, error = %e, "Credential check panicked");
                    false
                }
            };
            debug!(platform = %platform, valid, "Credential check finished");
            results.push((platform, valid));
        }
        results
    }

    fn service(&self, platform: Platform) -> Result<Arc<dyn PlatformService>> {
        self.registry
            .get(platform)
            .ok_or_else(|| FetchError::UnsupportedPlatform {
                platform,
                available: self.registry.available_platforms(),
            })
    }

    fn dispatch_latest_post(
        &self,
        platform: Platform,
        identifier: &str,
    ) -> Result<JoinHandle<Result<Option<Post>>>> {
        let service = self.service(platform)?;
        let identifier = identifier.to_string();

        Ok(self
            .pool
            .submit(async move { service.get_latest_post(&identifier).await }))
    }
}

/// Await a worker task, turning a panic or cancellation into `Internal`
async fn join<T>(handle: JoinHandle<Result<T>>) -> Result<T> {
    match handle.await {
        Ok(result) => result,
        Err(e) => {
            error!(error = %e, "Worker task panicked");
            Err(FetchError::Internal(e.to_string()))
        }
    }
}
