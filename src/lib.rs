//! Workspace placeholder crate.
//!
//! This crate exposes feature flags that map to the individual platform
//! providers wired by `core-service` (`youtube`, `twitter`, `instagram`).
//! Presentation layers can depend on `social-fetcher-workspace` and pick the
//! platforms they need without wiring each provider crate individually.

#[cfg(any(feature = "youtube", feature = "twitter", feature = "instagram"))]
pub use core_platform::{ChannelInfo, FetchError, FetchOutcome, Platform, Post};
#[cfg(any(feature = "youtube", feature = "twitter", feature = "instagram"))]
pub use core_runtime::config::{FetcherConfig, PlatformCredentials};
#[cfg(any(feature = "youtube", feature = "twitter", feature = "instagram"))]
pub use core_service::{bootstrap, ServiceRegistry, SocialMediaFetcher, WorkerPool};
