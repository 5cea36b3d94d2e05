//! Pagination resolver
//!
//! Walks the `next` link chain of a listing. When a `next` link fails while
//! records are still missing, it asks for the listing again starting after
//! the last record it saw. That repair is tried once per break; if it fails
//! too the walk stops and keeps what it already has.

use super::types::{
    alternate_reference, WalkOutcome, WalkPhase, WalkReport, WalkState, DEFAULT_RESUME_PARAM,
};
use crate::error::{Error, Result};
use crate::http::PageSource;
use crate::output::PageSink;
use crate::retry::RetryPolicy;
use crate::types::Page;
use tracing::{debug, error, info, warn};

/// Where a walk starts and how it resumes after a broken link
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Reference of the first page
    pub start_reference: String,
    /// Listing reference the alternate continuation is built on
    pub base_reference: String,
    /// Query parameter carrying the resume anchor
    pub resume_param: String,
}

impl ResolverConfig {
    /// Start at `base` and resume on it with the default parameter
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            start_reference: base.clone(),
            base_reference: base,
            resume_param: DEFAULT_RESUME_PARAM.to_string(),
        }
    }

    /// Start somewhere other than the base listing
    #[must_use]
    pub fn with_start(mut self, start: impl Into<String>) -> Self {
        self.start_reference = start.into();
        self
    }

    /// Use a different resume parameter
    #[must_use]
    pub fn with_resume_param(mut self, param: impl Into<String>) -> Self {
        self.resume_param = param.into();
        self
    }
}

/// Drives one walk over a listing
#[derive(Debug)]
pub struct PaginationResolver<S> {
    source: S,
    policy: RetryPolicy,
    config: ResolverConfig,
}

impl<S: PageSource> PaginationResolver<S> {
    /// Create a resolver
    pub fn new(source: S, policy: RetryPolicy, config: ResolverConfig) -> Self {
        Self {
            source,
            policy,
            config,
        }
    }

    /// Get the page source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Get the resolver configuration
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Walk the listing, handing each accepted page to `sink`.
    ///
    /// Fetch failures never surface as `Err`: they end the walk with a
    /// [`WalkOutcome::Failed`] report that still carries every page
    /// collected. Only sink errors abort with `Err`.
    pub async fn walk(&self, sink: &mut dyn PageSink) -> Result<WalkReport> {
        let mut state = WalkState::new();
        let mut pages = Vec::new();

        let start = self.config.start_reference.as_str();
        let first = match self.policy.fetch(&self.source, start).await {
            Ok(page) => page,
            Err(e) => {
                error!("Error fetching initial page {start}: {e}");
                return Ok(finish_failed(state, pages, start, e));
            }
        };

        state.declare_total(first.total);
        state.phase = WalkPhase::Walking;
        info!(
            "First page declares {} records",
            state
                .declared_total
                .map_or_else(|| "an unknown number of".to_string(), |t| t.to_string())
        );

        let mut current = accept(first, sink, &mut pages, &mut state)?;

        loop {
            let next = current.next.take().unwrap_or_default();
            state.count(current.len, current.last_id.as_deref());
            info!("Processed {} records so far...", state.progress());

            let fetched = if next.trim().is_empty() {
                debug!("Page {} has no next link", state.pages);
                Err(Error::EmptyReference)
            } else {
                self.policy.fetch(&self.source, &next).await
            };

            match fetched {
                Ok(page) => {
                    let finished = state.reached_total() || page.is_empty();
                    current = accept(page, sink, &mut pages, &mut state)?;
                    if finished {
                        state.count(current.len, current.last_id.as_deref());
                        return Ok(finish_done(state, pages));
                    }
                }
                Err(e) if e.is_cancelled() => {
                    return Ok(finish_failed(state, pages, &next, e));
                }
                Err(e) => {
                    if !matches!(e, Error::EmptyReference) {
                        warn!("Unable to fetch canonical next reference '{next}': {e}");
                    }
                    state.phase = WalkPhase::Recovering;

                    match self.recover(&mut state).await {
                        Recovery::Complete => return Ok(finish_done(state, pages)),
                        Recovery::Resumed(page) => {
                            current = accept(page, sink, &mut pages, &mut state)?;
                            state.phase = WalkPhase::Walking;
                        }
                        Recovery::Failed { reference, error } => {
                            error!("Alternate continuation {reference} failed: {error}");
                            return Ok(finish_failed(state, pages, &reference, error));
                        }
                    }
                }
            }
        }
    }

    /// One attempt at the alternate continuation
    async fn recover(&self, state: &mut WalkState) -> Recovery {
        if state.exhausted() {
            info!(
                "Canonical next failed after {} records; treating as end of listing",
                state.progress()
            );
            return Recovery::Complete;
        }

        warn!("Only got {} records", state.progress());

        let Some(anchor) = state.anchor.clone() else {
            return Recovery::Failed {
                reference: self.config.base_reference.clone(),
                error: Error::Other("no recovery anchor recorded".to_string()),
            };
        };

        let reference = match alternate_reference(
            &self.config.base_reference,
            &self.config.resume_param,
            &anchor,
        ) {
            Ok(reference) => reference,
            Err(error) => {
                return Recovery::Failed {
                    reference: self.config.base_reference.clone(),
                    error,
                }
            }
        };

        state.recovery_attempts += 1;
        warn!("Retry fetching {reference} instead");

        match self.policy.fetch(&self.source, &reference).await {
            Ok(page) => Recovery::Resumed(page),
            Err(error) => Recovery::Failed { reference, error },
        }
    }
}

/// Result of the recovering phase
enum Recovery {
    Complete,
    Resumed(Page),
    Failed { reference: String, error: Error },
}

/// What the walk keeps about the current page once it has been stored
struct Current {
    next: Option<String>,
    len: u64,
    last_id: Option<String>,
}

/// Hand a page to the sink and store it
fn accept(
    page: Page,
    sink: &mut dyn PageSink,
    pages: &mut Vec<Page>,
    state: &mut WalkState,
) -> Result<Current> {
    sink.write_page(&page)?;
    state.pages += 1;

    let current = Current {
        next: page.next_link().map(ToString::to_string),
        len: page.len() as u64,
        last_id: page.last_id().map(ToString::to_string),
    };
    pages.push(page);
    Ok(current)
}

fn finish_done(mut state: WalkState, pages: Vec<Page>) -> WalkReport {
    state.phase = WalkPhase::Done;
    info!("Walk complete: {} records in {} pages", state.progress(), state.pages);
    WalkReport {
        outcome: WalkOutcome::Done,
        state,
        pages,
    }
}

fn finish_failed(
    mut state: WalkState,
    pages: Vec<Page>,
    reference: &str,
    error: Error,
) -> WalkReport {
    state.phase = WalkPhase::Failed;
    WalkReport {
        outcome: WalkOutcome::Failed {
            reference: reference.to_string(),
            error,
        },
        state,
        pages,
    }
}
