//! # Reqwest Transport
//!
//! Production implementation of [`bridge_traits::HttpClient`] backed by a
//! pooled `reqwest::Client` with rustls.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_reqwest::ReqwestHttpClient;
//! use bridge_traits::{HttpClient, HttpRequest};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> bridge_traits::error::Result<()> {
//!     let client = ReqwestHttpClient::new(Duration::from_secs(30))?;
//!     let response = client
//!         .execute(HttpRequest::get("https://www.googleapis.com/youtube/v3/i18nRegions"))
//!         .await?;
//!     println!("{}", response.status);
//!     Ok(())
//! }
//! ```

mod http;

pub use http::ReqwestHttpClient;
