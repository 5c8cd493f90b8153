//! Service registry keyed by platform

use std::fmt;
use std::sync::Arc;

use core_platform::{Platform, PlatformService};
use tracing::{info, warn};

/// Immutable map from [`Platform`] to the service that handles it
///
/// Built once at bootstrap and shared read-only by every request. Platforms
/// keep the order in which they were registered.
#[derive(Clone, Default)]
pub struct ServiceRegistry {
    services: Vec<(Platform, Arc<dyn PlatformService>)>,
}

impl ServiceRegistry {
    pub fn builder() -> ServiceRegistryBuilder {
        ServiceRegistryBuilder::default()
    }

    pub fn get(&self, platform: Platform) -> Option<Arc<dyn PlatformService>> {
        self.services
            .iter()
            .find(|(registered, _)| *registered == platform)
            .map(|(_, service)| Arc::clone(service))
    }

    pub fn contains(&self, platform: Platform) -> bool {
        self.services.iter().any(|(registered, _)| *registered == platform)
    }

    /// Registered platforms in registration order
    pub fn available_platforms(&self) -> Vec<Platform> {
        self.services.iter().map(|(platform, _)| *platform).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Platform, &Arc<dyn PlatformService>)> {
        self.services.iter().map(|(platform, service)| (*platform, service))
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceRegistry")
            .field("platforms", &self.available_platforms())
            .finish()
    }
}

/// Collects services during bootstrap
///
/// A platform whose construction fails is logged and left out; the rest of
/// the registry is unaffected.
#[derive(Default)]
pub struct ServiceRegistryBuilder {
    services: Vec<(Platform, Arc<dyn PlatformService>)>,
}

impl ServiceRegistryBuilder {
    /// Construct a service with `factory` and register it under `platform`
    pub fn register_with<S, F>(self, platform: Platform, factory: F) -> Self
    where
        S: PlatformService + 'static,
        F: FnOnce() -> core_platform::Result<S>,
    {
        match factory() {
            Ok(service) => self.insert(platform, Arc::new(service)),
            Err(e) => {
                warn!(
                    platform = %platform,
                    error = %e,
                    "Service initialization failed; platform will be unavailable"
                );
                self
            }
        }
    }

    /// Register an already constructed service under its own platform tag
    pub fn register(self, service: Arc<dyn PlatformService>) -> Self {
        let platform = service.platform();
        self.insert(platform, service)
    }

    fn insert(mut self, platform: Platform, service: Arc<dyn PlatformService>) -> Self {
        if service.platform() != platform {
            warn!(
                platform = %platform,
                service_platform = %service.platform(),
                "Service platform does not match registry key; skipping"
            );
            return self;
        }

        if self.services.iter().any(|(registered, _)| *registered == platform) {
            warn!(platform = %platform, "Platform already registered; keeping the first service");
            return self;
        }

        info!(platform = %platform, "Registered platform service");
        self.services.push((platform, service));
        self
    }

    pub fn build(self) -> ServiceRegistry {
        ServiceRegistry {
            services: self.services,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use core_platform::{ChannelInfo, FetchError, Post};

    struct NamedService(Platform);

    #[async_trait]
    impl PlatformService for NamedService {
        fn platform(&self) -> Platform {
            self.0
        }

        async fn get_channel_info(&self, identifier: &str) -> core_platform::Result<ChannelInfo> {
            Err(FetchError::ChannelNotFound(identifier.to_string()))
        }

        async fn get_latest_post(&self, _identifier: &str) -> core_platform::Result<Option<Post>> {
            Ok(None)
        }

        async fn validate_credentials(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_registration_order_is_preserved() {
        let registry = ServiceRegistry::builder()
            .register(Arc::new(NamedService(Platform::Instagram)))
            .register(Arc::new(NamedService(Platform::YouTube)))
            .build();

        assert_eq!(
            registry.available_platforms(),
            vec![Platform::Instagram, Platform::YouTube]
        );
        assert_eq!(registry.len(), 2);
        assert!(registry.contains(Platform::YouTube));
        assert!(!registry.contains(Platform::Twitter));
        assert!(registry.get(Platform::Twitter).is_none());
    }

    #[test]
    fn test_failed_factory_is_omitted() {
        let registry = ServiceRegistry::builder()
            .register_with(Platform::YouTube, || {
                Err::<NamedService, _>(FetchError::Authentication(
                    "YouTube API key not provided".to_string(),
                ))
            })
            .register_with(Platform::Twitter, || Ok(NamedService(Platform::Twitter)))
            .build();

        assert_eq!(registry.available_platforms(), vec![Platform::Twitter]);
    }

    #[test]
    fn test_mismatched_platform_is_rejected() {
        let registry = ServiceRegistry::builder()
            .register_with(Platform::YouTube, || Ok(NamedService(Platform::Twitter)))
            .build();

        assert!(registry.is_empty());
    }

    #[test]
    fn test_duplicate_keeps_first() {
        let first: Arc<dyn PlatformService> = Arc::new(NamedService(Platform::Twitter));
        let registry = ServiceRegistry::builder()
            .register(Arc::clone(&first))
            .register(Arc::new(NamedService(Platform::Twitter)))
            .build();

        assert_eq!(registry.len(), 1);
        let stored = registry.get(Platform::Twitter).unwrap();
        assert!(Arc::ptr_eq(&stored, &first));
    }

    #[test]
    fn test_debug_lists_platforms() {
        let registry = ServiceRegistry::builder()
            .register(Arc::new(NamedService(Platform::YouTube)))
            .build();

        assert_eq!(
            format!("{:?}", registry),
            "ServiceRegistry { platforms: [YouTube] }"
        );
    }
}
