#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![warn(warnings)]

//! Outbound HTTP client for storefront components
//!
//! This crate provides a hyper-based HTTP client with:
//! - Automatic TLS via rustls (HTTPS only by default)
//! - Connection pooling
//! - Per-request timeouts
//! - User-Agent header injection (tower-http `SetRequestHeader`)
//! - **Transparent response decompression** (gzip, brotli, deflate)
//! - Size- and time-limited body reads
//!
//! There are no automatic retries: every `send()` is exactly one attempt.
//! `send()` returns `Ok` for every HTTP status; [`HttpError::stage`] tells a
//! request that was never sent apart from one that got no complete answer.
//!
//! # Example
//!
//! ```ignore
//! use storefront_http::HttpClient;
//! use std::time::Duration;
//!
//! let client = HttpClient::builder()
//!     .timeout(Duration::from_secs(10))
//!     .user_agent("storefront/1.0")
//!     .build()?;
//!
//! let resp = client
//!     .put("https://shop.example.com/api/resource")
//!     .json(&payload)?
//!     .send()
//!     .await?;
//! ```

mod builder;
mod client;
mod config;
mod error;
mod request;
mod response;
mod tls;

pub use builder::HttpClientBuilder;
pub use client::HttpClient;
pub use config::{DEFAULT_USER_AGENT, TlsRootConfig, TransportSecurity};
pub use error::{ErrorStage, HttpError, InvalidUriKind};
pub use request::RequestBuilder;
pub use response::{HttpResponse, ResponseBody};
