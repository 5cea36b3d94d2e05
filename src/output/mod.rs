//! Output module
//!
//! Persists accepted pages.
//!
//! # Overview
//!
//! This module provides:
//! - `PageSink` - the seam the walk writes through
//! - `ArchiveSink` - one pretty-printed JSON document per record
//! - `SummarySink` - a dated CSV report with one row per record

mod archive;
mod sink;
mod summary;

pub use archive::{read_record, ArchiveSink};
pub use sink::{PageSink, SinkSet};
pub use summary::{
    normalize_publisher, read_summary, summary_file_name, summary_path, SummaryRow, SummarySink,
    SUMMARY_HEADER,
};
