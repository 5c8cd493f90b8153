//! # Core Platform Module
//!
//! Shared vocabulary for every platform provider.
//!
//! ## Overview
//!
//! This crate provides:
//! - The normalized data model ([`Post`], [`ChannelInfo`], [`Platform`])
//! - The error taxonomy ([`FetchError`]) that is the only error type allowed
//!   to cross a provider boundary
//! - The [`PlatformService`] trait implemented by each provider crate
//! - The [`ResilientHttpClient`] every provider issues its upstream calls
//!   through (per-attempt timeout, exponential backoff, rate-limit handling)

pub mod error;
pub mod http;
pub mod models;
pub mod service;

pub use error::{FetchError, Result};
pub use http::{ResilientHttpClient, RetryPolicy};
pub use models::{ChannelInfo, FetchOutcome, ParsePlatformError, Platform, Post};
pub use service::PlatformService;
