//! HTTP client
//!
//! A thin wrapper around `reqwest` that:
//! - resolves relative references against the catalog base URL
//! - applies default headers, user agent and timeout
//! - turns non-success statuses into typed errors
//!
//! Every call is a single attempt. Retrying is the job of the retry policy.

use crate::error::{Error, Result};
use reqwest::{Client, Response};
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL used to resolve relative references
    pub base_url: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        let mut default_headers = HashMap::new();
        default_headers.insert("Accept".to_string(), "application/fhir+json".to_string());

        Self {
            base_url: None,
            timeout: Duration::from_secs(60),
            default_headers,
            user_agent: format!("catalog-harvest/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Single-attempt HTTP client
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Issue one GET and return the response if its status is a success
    pub async fn get(&self, reference: &str) -> Result<Response> {
        let full_url = self.resolve(reference)?;

        let mut req = self.client.get(full_url.as_str());
        for (key, value) in &self.config.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout {
                    timeout_ms: self.config.timeout.as_millis() as u64,
                }
            } else {
                Error::Http(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::http_status(status.as_u16(), full_url.as_str()));
        }

        debug!("Request succeeded: GET {full_url}");
        Ok(response)
    }

    /// Issue one GET and return the body as text
    pub async fn get_text(&self, reference: &str) -> Result<String> {
        let response = self.get(reference).await?;
        Ok(response.text().await?)
    }

    /// Resolve a reference into an absolute URL.
    ///
    /// Absolute references are used as-is (after trimming); relative ones are
    /// joined onto the configured base URL.
    pub fn resolve(&self, reference: &str) -> Result<Url> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(Error::EmptyReference);
        }

        match Url::parse(reference) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let base = self
                    .config
                    .base_url
                    .as_deref()
                    .ok_or_else(|| Error::missing_field("base_url"))?;
                Ok(Url::parse(base)?.join(reference)?)
            }
            Err(e) => Err(Error::InvalidUrl(e)),
        }
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
