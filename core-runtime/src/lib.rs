//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the social media fetcher:
//! - Logging and tracing infrastructure
//! - Configuration management (builder + environment loading)
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that every other crate depends
//! on. It establishes the logging conventions, credential redaction helpers
//! and the validated [`FetcherConfig`](config::FetcherConfig) consumed by
//! bootstrap.

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
