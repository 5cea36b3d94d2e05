//! CLI module
//!
//! Command-line interface for harvesting a catalog.
//!
//! # Commands
//!
//! - `harvest` - Walk the whole listing and write the archive and summary
//! - `check` - Fetch the first page once and report what it declares
//! - `config` - Print the effective configuration

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::{harvest, RunSummary, Runner};
