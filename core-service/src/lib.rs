//! Core service façade and bootstrap helpers.
//!
//! This crate wires the transport from `bridge-reqwest` and the platform
//! providers into a [`SocialMediaFetcher`]. Each provider is behind a cargo
//! feature (`youtube`, `twitter`, `instagram`); platforms whose credentials
//! are missing at bootstrap are left out of the [`ServiceRegistry`] and
//! reported as unsupported on lookup.
//!
//! ```ignore
//! use core_runtime::config::FetcherConfig;
//! use core_service::bootstrap;
//!
//! let fetcher = bootstrap(&FetcherConfig::from_env()?)?;
//! let post = fetcher.get_latest_post(Platform::YouTube, "@rustlang").await?;
//! ```

pub mod bootstrap;
pub mod error;
pub mod fetcher;
pub mod pool;
pub mod registry;

pub use bootstrap::{bootstrap, bootstrap_with_transport, build_registry};
pub use error::{CoreError, Result};
pub use fetcher::SocialMediaFetcher;
pub use pool::WorkerPool;
pub use registry::{ServiceRegistry, ServiceRegistryBuilder};
