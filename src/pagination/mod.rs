//! Pagination module
//!
//! Walks a listing through its `next` links and repairs broken links.
//!
//! # Overview
//!
//! The resolver moves through `Init → Walking → (Recovering) → Done | Failed`.
//! Progress is tracked against the total declared by the first page. When a
//! `next` link fails before that total is reached, one alternate continuation
//! is built from the last record seen and tried in its place.

mod resolver;
mod types;

pub use resolver::{PaginationResolver, ResolverConfig};
pub use types::{
    alternate_reference, WalkOutcome, WalkPhase, WalkReport, WalkState, DEFAULT_RESUME_PARAM,
};
