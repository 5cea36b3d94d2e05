//! Shared fixtures for unit tests

use crate::error::{Error, Result};
use crate::http::PageSource;
use crate::output::PageSink;
use crate::retry::Sleeper;
use crate::types::{Link, Page, Record};
use async_trait::async_trait;
use serde_json::json;
use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Build a record with predictable fields
pub(crate) fn record(id: &str) -> Record {
    Record::from_entry(json!({
        "fullUrl": format!("https://example.org/ValueSet/{id}"),
        "resource": {
            "resourceType": "ValueSet",
            "id": id,
            "name": format!("Name{id}"),
            "title": format!("Title {id}"),
            "publisher": "Acme\r\nLabs",
            "date": "2021-03-04"
        }
    }))
}

/// Build a page holding records `ids`, an optional `next` link and total
pub(crate) fn page(reference: &str, total: Option<u64>, next: Option<&str>, ids: &[String]) -> Page {
    let mut links = vec![Link::new("self", reference)];
    if let Some(next) = next {
        links.push(Link::new("next", next));
    }

    Page {
        reference: reference.to_string(),
        total,
        links,
        records: ids.iter().map(|id| record(id)).collect(),
    }
}

/// `count` identifiers starting at `start`: `vs-<start>`, `vs-<start+1>`, ...
pub(crate) fn ids(start: usize, count: usize) -> Vec<String> {
    (start..start + count).map(|i| format!("vs-{i}")).collect()
}

/// One scripted response
#[derive(Debug, Clone)]
pub(crate) enum Step {
    Page(Page),
    Empty,
    Status(u16),
    Fail(fn() -> Error),
}

#[derive(Debug, Default)]
struct Script {
    queue: VecDeque<Step>,
    fallback: Option<Step>,
}

/// A [`PageSource`] that replays scripted responses per reference and
/// records every call. Unknown references answer 404.
#[derive(Debug, Default)]
pub(crate) struct ScriptedSource {
    scripts: Mutex<HashMap<String, Script>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedSource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queue one response for `reference`
    pub(crate) fn then(self, reference: &str, step: Step) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .entry(reference.to_string())
            .or_default()
            .queue
            .push_back(step);
        self
    }

    /// Answer `reference` with `step` once its queue is drained
    pub(crate) fn always(self, reference: &str, step: Step) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .entry(reference.to_string())
            .or_default()
            .fallback = Some(step);
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn calls_to(&self, reference: &str) -> usize {
        self.calls().iter().filter(|c| *c == reference).count()
    }
}

#[async_trait]
impl PageSource for ScriptedSource {
    async fn fetch_page(&self, reference: &str) -> Result<Page> {
        self.calls.lock().unwrap().push(reference.to_string());

        let step = {
            let mut scripts = self.scripts.lock().unwrap();
            scripts.get_mut(reference).and_then(|script| {
                script
                    .queue
                    .pop_front()
                    .or_else(|| script.fallback.clone())
            })
        };

        match step {
            Some(Step::Page(page)) => Ok(page),
            Some(Step::Empty) => Ok(Page::empty(reference)),
            Some(Step::Status(status)) => Err(Error::http_status(status, reference)),
            Some(Step::Fail(error)) => Err(error()),
            None => Err(Error::http_status(404, reference)),
        }
    }
}

/// A [`PageSink`] that keeps pages in memory, optionally failing after a
/// number of pages
#[derive(Debug, Default)]
pub(crate) struct MemorySink {
    pub(crate) pages: Vec<Page>,
    fail_after: Option<usize>,
}

impl MemorySink {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn failing_after(pages: usize) -> Self {
        Self {
            pages: Vec::new(),
            fail_after: Some(pages),
        }
    }

    pub(crate) fn record_ids(&self) -> Vec<String> {
        self.pages
            .iter()
            .flat_map(|p| p.records.iter().map(|r| r.id.clone()))
            .collect()
    }
}

impl PageSink for MemorySink {
    fn write_page(&mut self, page: &Page) -> Result<usize> {
        if self.fail_after.is_some_and(|limit| self.pages.len() >= limit) {
            return Err(Error::output("sink is full"));
        }
        self.pages.push(page.clone());
        Ok(page.len())
    }
}

/// A [`Sleeper`] that records requested durations and returns immediately
#[derive(Debug, Default)]
pub(crate) struct RecordingSleeper {
    calls: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Durations requested so far, in order
    pub(crate) fn calls(&self) -> Vec<Duration> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.calls.lock().unwrap().push(duration);
    }
}

/// Log output captured for the current thread
#[derive(Debug, Clone, Default)]
pub(crate) struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Capture WARN and above until the guard is dropped
    pub(crate) fn warnings() -> (Self, tracing::subscriber::DefaultGuard) {
        let logs = Self::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();
        (logs, tracing::subscriber::set_default(subscriber))
    }

    pub(crate) fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
