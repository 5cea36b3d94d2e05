// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Catalog Harvest
//!
//! Harvests a paginated FHIR ValueSet catalog (PHIN VADS by default) into one
//! JSON document per ValueSet and a dated CSV summary.
//!
//! The listing's `next` links are unreliable: pages come back empty, links
//! point nowhere, and the chain sometimes breaks well before the declared
//! total. Every fetch is retried with a growing backoff, and a broken chain
//! is repaired once by asking for the listing again after the last record
//! seen.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use catalog_harvest::config::HarvestConfig;
//! use catalog_harvest::cli::harvest;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> catalog_harvest::Result<()> {
//!     let config = HarvestConfig::load("harvest.yaml")?;
//!     let summary = harvest(&config, true, CancellationToken::new()).await?;
//!     summary.log();
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     PaginationResolver                       │
//! │   Init → Walking → (Recovering) → Done | Failed              │
//! └──────────────────────────────────────────────────────────────┘
//!            │                                    │
//! ┌──────────┴──────────┐              ┌──────────┴──────────┐
//! │     RetryPolicy     │              │      PageSink       │
//! │ backoff, cancel     │              │ ArchiveSink  (JSON) │
//! ├─────────────────────┤              │ SummarySink  (CSV)  │
//! │     PageFetcher     │              └─────────────────────┘
//! │ HttpClient + decode │
//! └─────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Page, record and link types
pub mod types;

/// HTTP client and page fetcher
pub mod http;

/// Response decoding
pub mod decode;

/// Bounded retry with backoff
pub mod retry;

/// Listing walk and broken-link recovery
pub mod pagination;

/// Archive and summary output
pub mod output;

/// Harvest configuration
pub mod config;

/// Command-line interface
pub mod cli;

#[cfg(test)]
pub(crate) mod testing;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::HarvestConfig;
pub use error::{Error, Result};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
