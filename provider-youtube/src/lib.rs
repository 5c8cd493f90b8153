//! # YouTube Provider
//!
//! Implements `PlatformService` for the YouTube Data API v3.
//!
//! ## Overview
//!
//! This module provides:
//! - Channel resolution by ID, legacy username, `@handle` or free-text search
//! - Latest upload lookup with view/like/comment statistics
//! - API-key authentication via the `key` query parameter

mod service;
pub mod types;

pub use service::YouTubeService;
