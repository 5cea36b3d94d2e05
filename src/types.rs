//! Common types used throughout the harvester
//!
//! This module contains the in-memory catalog model (records, pages,
//! navigation links) and small shared enums.

use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

// ============================================================================
// Backoff
// ============================================================================

/// Type of backoff between retry attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Constant delay between retries
    Constant,
    /// Delay grows by the base unit on every attempt
    #[default]
    Linear,
    /// Delay doubles on every attempt
    Exponential,
}

// ============================================================================
// Navigation Links
// ============================================================================

/// Relation tag of the link pointing at the following page
pub const REL_NEXT: &str = "next";

/// Relation tag of the link pointing at the page itself
pub const REL_SELF: &str = "self";

/// A navigation link attached to a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Relation tag (`self`, `next`, `previous`, ...)
    #[serde(default, alias = "Relation")]
    pub relation: String,
    /// Opaque locator; may be relative or padded with whitespace
    #[serde(default, alias = "Url")]
    pub url: String,
}

impl Link {
    /// Create a new link
    pub fn new(relation: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            relation: relation.into(),
            url: url.into(),
        }
    }
}

// ============================================================================
// Record
// ============================================================================

/// One catalog entry
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Stable identifier
    pub id: String,
    /// Display name, also used to name the archived document
    pub name: String,
    /// Human-readable title
    pub title: String,
    /// Free-text publisher, may contain line breaks
    pub publisher: String,
    /// Date string as sent by the server
    pub date: String,
    /// Canonical location of the entry, when the server sends one
    pub full_url: Option<String>,
    /// The whole entry exactly as received
    pub detail: JsonValue,
}

impl Record {
    /// Build a record from one bundle entry (`{fullUrl, resource: {...}}`).
    ///
    /// Missing string fields become empty strings; the entry itself is kept
    /// verbatim in `detail`.
    pub fn from_entry(entry: JsonValue) -> Self {
        let resource = entry.get("resource");
        let field = |key: &str| -> String {
            resource
                .and_then(|r| r.get(key))
                .and_then(JsonValue::as_str)
                .unwrap_or_default()
                .to_string()
        };

        let full_url = entry
            .get("fullUrl")
            .and_then(JsonValue::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string);

        let id = field("id");
        let name = field("name");
        let title = field("title");
        let publisher = field("publisher");
        let date = field("date");

        Self {
            id,
            name,
            title,
            publisher,
            date,
            full_url,
            detail: entry,
        }
    }
}

// ============================================================================
// Page
// ============================================================================

/// One fetched batch of records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Reference the page was fetched from
    pub reference: String,
    /// Total declared by the server, if any
    pub total: Option<u64>,
    /// Navigation links
    pub links: Vec<Link>,
    /// Records in server order
    pub records: Vec<Record>,
}

impl Page {
    /// Create an empty page for a reference
    pub fn empty(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            ..Default::default()
        }
    }

    /// Number of records on the page
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the page carries no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Trimmed target of the first link with the given relation
    pub fn link(&self, relation: &str) -> Option<&str> {
        self.links
            .iter()
            .find(|l| l.relation == relation)
            .map(|l| l.url.trim())
            .filter(|u| !u.is_empty())
    }

    /// Trimmed `next` link target
    pub fn next_link(&self) -> Option<&str> {
        self.link(REL_NEXT)
    }

    /// Trimmed `self` link target
    pub fn self_link(&self) -> Option<&str> {
        self.link(REL_SELF)
    }

    /// Identifier of the last record, used as the recovery anchor
    pub fn last_id(&self) -> Option<&str> {
        self.records.last().map(|r| r.id.as_str())
    }
}
