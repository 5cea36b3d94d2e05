//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Catalog harvester
#[derive(Parser, Debug)]
#[command(name = "catalog-harvest")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Listing to walk (overrides the configuration)
    #[arg(short, long, global = true)]
    pub base_url: Option<String>,

    /// Output directory (overrides the configuration)
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Walk the listing and write every record
    Harvest {
        /// Only write the summary file, not one document per record
        #[arg(long)]
        no_archive: bool,
    },

    /// Fetch the first page and report the declared total
    Check,

    /// Print the effective configuration as YAML
    Config,
}
