//! Retry policy
//!
//! Wraps a single page fetch so the caller only ever sees a non-empty page or
//! a terminal failure. An empty page is treated as a transient condition; so
//! is any transport, status or decode fault. They share one budget and
//! backoff.

use super::sleeper::{Sleeper, TokioSleeper};
use crate::error::{Error, Result};
use crate::http::PageSource;
use crate::types::{BackoffType, Page};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Default number of retries after the first attempt
pub const DEFAULT_MAX_RETRIES: u32 = 10;

/// Default backoff unit
pub const DEFAULT_BACKOFF_BASE: Duration = Duration::from_secs(3);

/// Configuration for the retry policy
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries allowed after the first attempt
    pub max_retries: u32,
    /// Backoff unit
    pub backoff_base: Duration,
    /// How the delay grows with the attempt number
    pub backoff_type: BackoffType,
    /// Upper bound for a single delay
    pub max_backoff: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_base: DEFAULT_BACKOFF_BASE,
            backoff_type: BackoffType::Linear,
            max_backoff: Duration::from_secs(300),
        }
    }
}

impl RetryConfig {
    /// Delay before retry number `attempt` (1-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        let attempt = attempt.max(1);
        let delay = match self.backoff_type {
            BackoffType::Constant => self.backoff_base,
            BackoffType::Linear => self.backoff_base.saturating_mul(attempt),
            BackoffType::Exponential => {
                let factor = 2u32.saturating_pow(attempt - 1);
                self.backoff_base.saturating_mul(factor)
            }
        };

        std::cmp::min(delay, self.max_backoff)
    }
}

/// Bounded retry around a [`PageSource`]
#[derive(Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
    sleeper: Arc<dyn Sleeper>,
    cancel: CancellationToken,
}

impl RetryPolicy {
    /// Create a policy that sleeps on the tokio timer
    pub fn new(config: RetryConfig) -> Self {
        Self {
            config,
            sleeper: Arc::new(TokioSleeper),
            cancel: CancellationToken::new(),
        }
    }

    /// Replace the sleeper
    #[must_use]
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Abort fetches and sleeps once `cancel` fires
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Get the policy configuration
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Get the cancellation token
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Fetch `reference` until it yields a non-empty page.
    ///
    /// Returns [`Error::EmptyReference`] without fetching for a blank
    /// reference, [`Error::RetriesExhausted`] once the budget is spent, and
    /// errors no retry can fix (unresolvable URLs) as-is.
    pub async fn fetch(&self, source: &dyn PageSource, reference: &str) -> Result<Page> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(Error::EmptyReference);
        }

        let mut retries = 0u32;
        loop {
            if self.cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }

            info!("Fetching {reference}");
            match source.fetch_page(reference).await {
                Ok(page) if !page.is_empty() => return Ok(page),
                Ok(_) => debug!("Empty page from {reference}"),
                Err(e) if e.is_retryable() => warn!("Failed to fetch {reference}: {e}"),
                Err(e) => return Err(e),
            }

            retries += 1;
            if retries > self.config.max_retries {
                return Err(Error::retries_exhausted(reference, self.config.max_retries));
            }

            let delay = self.config.backoff(retries);
            info!(
                "Sleeping for {} seconds (retry {retries}/{})",
                delay.as_secs_f64(),
                self.config.max_retries
            );
            tokio::select! {
                () = self.sleeper.sleep(delay) => {}
                () = self.cancel.cancelled() => return Err(Error::Cancelled),
            }
        }
    }
}

impl std::fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("config", &self.config)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}
