//! Backoff sleepers
//!
//! The retry policy sleeps through this seam so tests can observe the
//! schedule without waiting for it.

use async_trait::async_trait;
use std::time::Duration;

/// Something that can wait for a duration
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Wait for `duration`
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
