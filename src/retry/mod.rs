//! Retry module
//!
//! Bounded retry with backoff around a single page fetch.
//!
//! # Overview
//!
//! - `RetryPolicy` - guarantees a non-empty page or a terminal failure
//! - `RetryConfig` - retry budget and backoff schedule
//! - `Sleeper` - pluggable wait used between attempts

mod policy;
mod sleeper;

pub use policy::{RetryConfig, RetryPolicy, DEFAULT_BACKOFF_BASE, DEFAULT_MAX_RETRIES};
pub use sleeper::{Sleeper, TokioSleeper};
