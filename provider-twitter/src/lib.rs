//! # X/Twitter Provider
//!
//! Implements `PlatformService` for the X (Twitter) API v2 using an
//! app-only bearer token.
//!
//! Accounts are resolved by numeric user ID or by username (a leading `@`
//! is ignored). The latest post is the newest of the account's recent
//! tweets, with attached media resolved through the `includes.media`
//! expansion.

mod service;
pub mod types;

pub use service::TwitterService;
