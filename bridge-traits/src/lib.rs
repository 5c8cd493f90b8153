//! # Transport Bridge Traits
//!
//! Transport abstraction consumed by the fetch core.
//!
//! ## Overview
//!
//! This crate defines the contract between the platform providers and the
//! concrete HTTP stack. Providers never talk to `reqwest` directly; they go
//! through the resilient client in `core-platform`, which in turn drives an
//! [`HttpClient`](http::HttpClient) implementation supplied at bootstrap
//! (`bridge-reqwest` in production, a `mockall` mock in tests).
//!
//! ## Error Handling
//!
//! Every transport failure is reported as a [`BridgeError`](error::BridgeError)
//! that classifies the failure (timeout, connection, invalid request, other).
//! Non-2xx statuses are *not* errors at this layer: they are returned as
//! [`HttpResponse`](http::HttpResponse) values so that callers can decide on
//! retry and rate-limit handling.
//!
//! ## Thread Safety
//!
//! `HttpClient` requires `Send + Sync` so a single transport can be shared by
//! every provider across worker tasks.
//!
//! ## Example
//!
//! ```ignore
//! use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
//! use bridge_traits::error::Result;
//! use async_trait::async_trait;
//!
//! pub struct MyHttpClient {
//!     client: reqwest::Client,
//! }
//!
//! #[async_trait]
//! impl HttpClient for MyHttpClient {
//!     async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
//!         // Single attempt, no retry
//!         todo!()
//!     }
//! }
//! ```

pub mod error;
pub mod http;

pub use error::BridgeError;
pub use http::{HttpClient, HttpRequest, HttpResponse};
