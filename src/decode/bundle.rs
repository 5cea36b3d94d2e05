//! Bundle decoder
//!
//! Turns a search-result bundle body into a [`Page`]. Bodies that are not a
//! decodable bundle produce an empty page so the retry layer can treat them
//! like any other empty response.

use crate::error::{Error, Result};
use crate::types::{JsonValue, Link, Page, Record};
use serde::Deserialize;
use tracing::warn;

/// Wire shape of one page of results
#[derive(Debug, Deserialize)]
struct Bundle {
    #[serde(default, alias = "Total")]
    total: Option<u64>,
    #[serde(default, alias = "Link")]
    link: Vec<Link>,
    #[serde(default, alias = "Entry")]
    entry: Vec<JsonValue>,
}

/// Decode a response body into a page.
///
/// Never fails: a blank, non-JSON or malformed body yields an empty page for
/// `reference` and logs a warning.
pub fn decode_page(reference: &str, body: &str) -> Page {
    match try_decode_page(reference, body) {
        Ok(page) => page,
        Err(e) => {
            warn!("Treating undecodable body from {reference} as an empty page: {e}");
            Page::empty(reference)
        }
    }
}

/// Strict variant of [`decode_page`] that reports why a body was rejected
pub fn try_decode_page(reference: &str, body: &str) -> Result<Page> {
    let trimmed = body.trim_start();
    if trimmed.is_empty() {
        return Err(Error::decode("response body is empty"));
    }
    if !trimmed.starts_with('{') {
        return Err(Error::decode("response body is not a JSON object"));
    }

    let bundle: Bundle = serde_json::from_str(trimmed)
        .map_err(|e| Error::decode(format!("Failed to parse bundle: {e}")))?;

    Ok(Page {
        reference: reference.to_string(),
        total: bundle.total,
        links: bundle.link,
        records: bundle.entry.into_iter().map(Record::from_entry).collect(),
    })
}
