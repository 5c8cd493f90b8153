//! # Instagram Provider
//!
//! Implements `PlatformService` for the Instagram Graph API
//! (`graph.instagram.com`) with a long-lived user access token.
//!
//! The API only exposes the token owner's account and accounts addressed by
//! numeric ID, so username lookups are matched against the token owner.

mod service;
pub mod types;

pub use service::InstagramService;
