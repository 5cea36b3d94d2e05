//! Pagination types
//!
//! Walk state, phases and the report handed back to the caller.

use crate::error::{Error, Result};
use crate::types::Page;
use url::Url;

/// Default query parameter used to resume a listing after a given record
pub const DEFAULT_RESUME_PARAM: &str = "_getpages";

/// Phase of the walk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WalkPhase {
    /// Fetching the first page
    #[default]
    Init,
    /// Following `next` links
    Walking,
    /// The canonical `next` failed; trying the alternate continuation
    Recovering,
    /// Finished normally
    Done,
    /// Stopped early; collected pages are still reported
    Failed,
}

impl WalkPhase {
    /// True for `Done` and `Failed`
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

/// Progress of a walk, owned and mutated only by the resolver
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkState {
    /// Current phase
    pub phase: WalkPhase,
    /// Records counted so far
    pub cumulative: u64,
    /// Total declared by the first page
    pub declared_total: Option<u64>,
    /// Identifier of the last record of the latest counted page
    pub anchor: Option<String>,
    /// Alternate continuation fetches attempted
    pub recovery_attempts: u32,
    /// Pages accepted
    pub pages: u32,
}

impl WalkState {
    /// Create a fresh state
    pub fn new() -> Self {
        Self::default()
    }

    /// Freeze the declared total; later calls are ignored
    pub fn declare_total(&mut self, total: Option<u64>) {
        if self.phase == WalkPhase::Init {
            self.declared_total = total;
        }
    }

    /// Count a non-empty page and remember its last record as the anchor
    pub fn count_page(&mut self, page: &Page) {
        self.count(page.len() as u64, page.last_id());
    }

    pub(crate) fn count(&mut self, len: u64, last_id: Option<&str>) {
        if len == 0 {
            return;
        }
        self.cumulative += len;
        if let Some(id) = last_id.filter(|id| !id.trim().is_empty()) {
            self.anchor = Some(id.to_string());
        }
    }

    /// True once the cumulative count meets the declared total
    pub fn reached_total(&self) -> bool {
        self.declared_total
            .is_some_and(|total| self.cumulative >= total)
    }

    /// True when a failed continuation can be explained as the end of the
    /// listing. Without a declared total no shortfall can be measured.
    pub fn exhausted(&self) -> bool {
        self.declared_total.is_none() || self.reached_total()
    }

    /// Human-readable progress, e.g. `10 of 25`
    pub fn progress(&self) -> String {
        match self.declared_total {
            Some(total) => format!("{} of {total}", self.cumulative),
            None => format!("{} of unknown", self.cumulative),
        }
    }
}

/// How a walk ended
#[derive(Debug)]
pub enum WalkOutcome {
    /// All expected records were collected, or the listing ended
    Done,
    /// The walk stopped early
    Failed {
        /// Reference whose fetch ended the walk
        reference: String,
        /// Why it failed
        error: Error,
    },
}

impl WalkOutcome {
    /// True for `Done`
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// True for `Failed`
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Everything a walk produced
#[derive(Debug)]
pub struct WalkReport {
    /// How the walk ended
    pub outcome: WalkOutcome,
    /// Final walk state
    pub state: WalkState,
    /// Accepted pages, in walk order
    pub pages: Vec<Page>,
}

impl WalkReport {
    /// Number of records across all accepted pages
    pub fn record_count(&self) -> usize {
        self.pages.iter().map(Page::len).sum()
    }
}

/// Build the alternate continuation: `base` plus `param=<anchor>` in the query
pub fn alternate_reference(base: &str, param: &str, anchor: &str) -> Result<String> {
    let mut url = Url::parse(base.trim())?;
    url.query_pairs_mut().append_pair(param, anchor);
    Ok(url.to_string())
}
