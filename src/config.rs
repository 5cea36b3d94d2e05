//! Harvest configuration
//!
//! Settings for one harvest run, loaded from YAML. Every field has a default
//! matching the public PHIN VADS ValueSet endpoint, so an empty file (or no
//! file at all) is a valid configuration.

use crate::error::{Error, Result};
use crate::http::HttpClientConfig;
use crate::output::summary_path;
use crate::pagination::{ResolverConfig, DEFAULT_RESUME_PARAM};
use crate::retry::{RetryConfig, DEFAULT_MAX_RETRIES};
use crate::types::BackoffType;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Default listing the walk starts from
pub const DEFAULT_BASE_URL: &str = "https://phinvads.cdc.gov/baseStu3/ValueSet/";

/// Settings for a harvest run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarvestConfig {
    /// Base listing reference; also prefixes `selfUrl` in the summary
    pub base_url: String,

    /// First page to fetch, when different from `base_url`
    pub start_url: Option<String>,

    /// Query parameter used to resume after the last seen record
    pub resume_param: String,

    /// Retries after the first attempt of each fetch
    pub max_retries: u32,

    /// Backoff unit in milliseconds
    pub backoff_base_ms: u64,

    /// Backoff growth
    pub backoff_type: BackoffType,

    /// Upper bound for a single backoff, in seconds
    pub max_backoff_secs: u64,

    /// Per-request timeout, in seconds
    pub timeout_secs: u64,

    /// User agent override
    pub user_agent: Option<String>,

    /// Extra request headers
    pub headers: HashMap<String, String>,

    /// Root directory for all output
    pub output_dir: PathBuf,

    /// Sub-directory of `output_dir` holding one JSON document per record
    pub archive_dir: String,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            start_url: None,
            resume_param: DEFAULT_RESUME_PARAM.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_base_ms: 3_000,
            backoff_type: BackoffType::Linear,
            max_backoff_secs: 300,
            timeout_secs: 60,
            user_agent: None,
            headers: HashMap::new(),
            output_dir: PathBuf::from("results"),
            archive_dir: "valuesets".to_string(),
        }
    }
}

impl HarvestConfig {
    /// Load and validate a YAML configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse and validate a YAML configuration
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(yaml)
                .map_err(|e| Error::config(format!("Failed to parse config YAML: {e}")))?
        };
        config.validate()?;
        Ok(config)
    }

    /// Render as YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check that the configuration can drive a walk
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(Error::missing_field("base_url"));
        }
        Url::parse(self.base_url.trim())
            .map_err(|e| Error::invalid_value("base_url", e.to_string()))?;

        if let Some(start) = &self.start_url {
            if start.trim().is_empty() {
                return Err(Error::invalid_value("start_url", "cannot be blank"));
            }
        }

        if self.resume_param.trim().is_empty() {
            return Err(Error::invalid_value("resume_param", "cannot be blank"));
        }

        if self.max_retries == 0 {
            return Err(Error::invalid_value("max_retries", "must be at least 1"));
        }

        if self.timeout_secs == 0 {
            return Err(Error::invalid_value("timeout_secs", "must be at least 1"));
        }

        if self.archive_dir.trim().is_empty() {
            return Err(Error::invalid_value("archive_dir", "cannot be blank"));
        }

        Ok(())
    }

    /// Retry policy settings
    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig {
            max_retries: self.max_retries,
            backoff_base: Duration::from_millis(self.backoff_base_ms),
            backoff_type: self.backoff_type,
            max_backoff: Duration::from_secs(self.max_backoff_secs),
        }
    }

    /// HTTP client settings
    pub fn http_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .base_url(self.base_url.trim())
            .timeout(Duration::from_secs(self.timeout_secs));

        if let Some(agent) = &self.user_agent {
            builder = builder.user_agent(agent);
        }
        for (key, value) in &self.headers {
            builder = builder.header(key, value);
        }

        builder.build()
    }

    /// Resolver settings
    pub fn resolver_config(&self) -> ResolverConfig {
        let mut config =
            ResolverConfig::new(self.base_url.trim()).with_resume_param(self.resume_param.trim());
        if let Some(start) = &self.start_url {
            config = config.with_start(start.trim());
        }
        config
    }

    /// Directory receiving one document per record
    pub fn archive_path(&self) -> PathBuf {
        self.output_dir.join(&self.archive_dir)
    }

    /// Summary file for a run on `date`
    pub fn summary_path(&self, date: NaiveDate) -> PathBuf {
        summary_path(&self.output_dir, date)
    }
}
