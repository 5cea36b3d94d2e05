//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::config::HarvestConfig;
use crate::error::Result;
use crate::http::{HttpClient, PageFetcher, PageSource};
use crate::output::{ArchiveSink, PageSink, SinkSet, SummarySink};
use crate::pagination::{PaginationResolver, WalkOutcome};
use crate::retry::RetryPolicy;
use chrono::Local;
use serde_json::json;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Harvest { no_archive } => {
                let config = self.load_config()?;
                let cancel = CancellationToken::new();

                let shutdown = cancel.clone();
                tokio::spawn(async move {
                    if tokio::signal::ctrl_c().await.is_ok() {
                        warn!("Received interrupt, stopping the walk");
                        shutdown.cancel();
                    }
                });

                let summary = harvest(&config, !*no_archive, cancel).await?;
                summary.log();
                Ok(())
            }
            Commands::Check => self.check().await,
            Commands::Config => self.show_config(),
        }
    }

    /// Load the configuration file, if any, then apply command-line overrides
    pub fn load_config(&self) -> Result<HarvestConfig> {
        let mut config = match &self.cli.config {
            Some(path) => HarvestConfig::load(path)?,
            None => HarvestConfig::default(),
        };

        if let Some(base_url) = &self.cli.base_url {
            config.base_url.clone_from(base_url);
        }
        if let Some(output) = &self.cli.output {
            config.output_dir.clone_from(output);
        }

        config.validate()?;
        Ok(config)
    }

    /// Fetch the first page once, without retries
    async fn check(&self) -> Result<()> {
        let config = self.load_config()?;
        let start = config.resolver_config().start_reference;

        info!("Checking {start}");
        let fetcher = PageFetcher::new(HttpClient::with_config(config.http_config())?);
        let page = fetcher.fetch_page(&start).await?;

        if page.is_empty() {
            warn!("First page of {start} has no records");
        }

        let report = json!({
            "reference": page.reference,
            "total": page.total,
            "records": page.len(),
            "self": page.self_link(),
            "next": page.next_link(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        Ok(())
    }

    /// Print the effective configuration
    fn show_config(&self) -> Result<()> {
        let config = self.load_config()?;
        print!("{}", config.to_yaml()?);
        Ok(())
    }
}

/// What a harvest run produced
#[derive(Debug)]
pub struct RunSummary {
    /// How the walk ended
    pub outcome: WalkOutcome,
    /// Pages accepted
    pub pages: u32,
    /// Records written to every sink
    pub records: usize,
    /// Records declared by the first page
    pub declared_total: Option<u64>,
    /// Alternate continuations attempted
    pub recovery_attempts: u32,
    /// Wall-clock duration of the walk
    pub elapsed: Duration,
    /// Summary file written
    pub summary_path: PathBuf,
    /// Archive directory, when documents were written
    pub archive_dir: Option<PathBuf>,
}

impl RunSummary {
    /// True when the walk finished normally
    pub fn is_done(&self) -> bool {
        self.outcome.is_done()
    }

    /// Log the summary
    pub fn log(&self) {
        match &self.outcome {
            WalkOutcome::Done => info!("Walk finished"),
            WalkOutcome::Failed { reference, error } => {
                error!("Walk stopped at {reference}: {error}");
            }
        }

        let total = self
            .declared_total
            .map_or_else(|| "unknown".to_string(), |t| t.to_string());
        info!(
            "Wrote {} of {total} records from {} pages ({} recovery attempts) in {:.1}s",
            self.records,
            self.pages,
            self.recovery_attempts,
            self.elapsed.as_secs_f64()
        );
        info!("Summary: {}", self.summary_path.display());
        if let Some(dir) = &self.archive_dir {
            info!("Documents: {}", dir.display());
        }
        info!("Done!");
    }
}

/// Walk the configured listing into the summary file and, when `archive` is
/// set, one document per record.
///
/// A walk that stops early still returns `Ok` with what it collected; only
/// output failures are errors.
pub async fn harvest(
    config: &HarvestConfig,
    archive: bool,
    cancel: CancellationToken,
) -> Result<RunSummary> {
    let started = Instant::now();

    let fetcher = PageFetcher::new(HttpClient::with_config(config.http_config())?);
    let policy = RetryPolicy::new(config.retry_config()).with_cancellation(cancel);
    let resolver = PaginationResolver::new(fetcher, policy, config.resolver_config());

    let summary_path = config.summary_path(Local::now().date_naive());
    let mut sinks = SinkSet::new().with(SummarySink::create(&summary_path, config.base_url.trim())?);

    let archive_dir = archive.then(|| config.archive_path());
    if let Some(dir) = &archive_dir {
        sinks = sinks.with(ArchiveSink::new(dir));
    }

    info!("Getting all pages from {}", resolver.config().start_reference);
    let report = resolver.walk(&mut sinks).await?;
    sinks.finish()?;

    Ok(RunSummary {
        records: report.record_count(),
        pages: report.state.pages,
        declared_total: report.state.declared_total,
        recovery_attempts: report.state.recovery_attempts,
        outcome: report.outcome,
        elapsed: started.elapsed(),
        summary_path,
        archive_dir,
    })
}
