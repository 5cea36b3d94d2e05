//! Page fetcher
//!
//! One network retrieval decoded into one [`Page`].

use super::client::HttpClient;
use crate::decode::decode_page;
use crate::error::Result;
use crate::types::Page;
use async_trait::async_trait;
use tracing::debug;

/// Something that can turn a reference into a page.
///
/// Implementations must not retry: a transport failure is returned as an
/// error and a successfully received but empty response as an empty page.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch and decode the page at `reference`
    async fn fetch_page(&self, reference: &str) -> Result<Page>;
}

/// HTTP-backed [`PageSource`]
#[derive(Debug)]
pub struct PageFetcher {
    client: HttpClient,
}

impl PageFetcher {
    /// Create a fetcher on top of an HTTP client
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Get the underlying client
    pub fn client(&self) -> &HttpClient {
        &self.client
    }
}

#[async_trait]
impl PageSource for PageFetcher {
    async fn fetch_page(&self, reference: &str) -> Result<Page> {
        let url = self.client.resolve(reference)?;
        let body = self.client.get_text(url.as_str()).await?;
        let page = decode_page(url.as_str(), &body);
        debug!(
            "Decoded {} records from {} (declared total {:?})",
            page.len(),
            url,
            page.total
        );
        Ok(page)
    }
}
