//! HTTP module
//!
//! Provides the single-attempt HTTP client and the page fetcher built on it.
//!
//! # Features
//!
//! - **Reference Resolution**: relative `next` links are joined onto the base URL
//! - **Typed Failures**: transport errors and non-success statuses become [`crate::Error`]s
//! - **Lenient Decoding**: undecodable bodies come back as empty pages

mod client;
mod fetcher;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use fetcher::{PageFetcher, PageSource};
