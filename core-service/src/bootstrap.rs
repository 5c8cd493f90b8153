//! Wiring of configuration, transport, providers and pool

use std::sync::Arc;

use bridge_reqwest::ReqwestHttpClient;
use bridge_traits::HttpClient;
use core_platform::ResilientHttpClient;
use core_runtime::config::FetcherConfig;
use tracing::{info, warn};

use crate::error::Result;
use crate::fetcher::SocialMediaFetcher;
use crate::pool::WorkerPool;
use crate::registry::ServiceRegistry;

/// Build a ready-to-use fetcher backed by the reqwest transport
///
/// # Errors
///
/// Fails when the configuration is invalid or the HTTP client cannot be
/// constructed. Missing credentials are not an error: the affected platforms
/// are simply left out of the registry.
pub fn bootstrap(config: &FetcherConfig) -> Result<SocialMediaFetcher> {
    config.validate()?;
    let transport = ReqwestHttpClient::new(config.request_timeout)?;
    Ok(bootstrap_with_transport(config, Arc::new(transport)))
}

/// Same as [`bootstrap`] with a caller supplied transport
pub fn bootstrap_with_transport(
    config: &FetcherConfig,
    transport: Arc<dyn HttpClient>,
) -> SocialMediaFetcher {
    let client = ResilientHttpClient::from_config(transport, config);
    let registry = build_registry(config, &client);

    if registry.is_empty() {
        warn!("No platform services available; check the configured credentials");
    } else {
        info!(
            platforms = ?registry.available_platforms(),
            workers = config.worker_pool_size,
            "Social media fetcher initialized"
        );
    }

    SocialMediaFetcher::new(registry, WorkerPool::new(config.worker_pool_size))
}

/// Register one service per compiled-in provider
#[cfg_attr(
    not(any(feature = "youtube", feature = "twitter", feature = "instagram")),
    allow(unused_variables)
)]
pub fn build_registry(config: &FetcherConfig, client: &ResilientHttpClient) -> ServiceRegistry {
    let builder = ServiceRegistry::builder();
    let credentials = &config.credentials;

    #[cfg(feature = "youtube")]
    let builder = builder.register_with(core_platform::Platform::YouTube, || {
        provider_youtube::YouTubeService::new(client.clone(), credentials.youtube_api_key.clone())
    });

    #[cfg(feature = "twitter")]
    let builder = builder.register_with(core_platform::Platform::Twitter, || {
        provider_twitter::TwitterService::new(
            client.clone(),
            credentials.twitter_bearer_token.clone(),
        )
    });

    #[cfg(feature = "instagram")]
    let builder = builder.register_with(core_platform::Platform::Instagram, || {
        provider_instagram::InstagramService::new(
            client.clone(),
            credentials.instagram_access_token.clone(),
        )
    });

    builder.build()
}
