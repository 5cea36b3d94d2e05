//! Summary sink
//!
//! Appends one CSV row per record to a dated report file.

use super::sink::PageSink;
use crate::error::{Error, Result, ResultExt};
use crate::types::{Page, Record};
use chrono::NaiveDate;
use regex::Regex;
use serde::Deserialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Header row of every summary file
pub const SUMMARY_HEADER: [&str; 6] = ["selfUrl", "id", "name", "title", "publisher", "date"];

static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n").expect("line break pattern is valid"));

/// Collapse line breaks to single spaces and trim surrounding whitespace
pub fn normalize_publisher(publisher: &str) -> String {
    LINE_BREAK.replace_all(publisher, " ").trim().to_string()
}

/// File name of the summary for a run on `date`
pub fn summary_file_name(date: NaiveDate) -> String {
    format!("results-{}.csv", date.format("%Y-%m-%d"))
}

/// One summary row
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SummaryRow {
    /// Base reference concatenated with the record identifier
    #[serde(rename = "selfUrl")]
    pub self_url: String,
    pub id: String,
    pub name: String,
    pub title: String,
    /// Publisher with line breaks collapsed
    pub publisher: String,
    pub date: String,
}

impl SummaryRow {
    /// Build the row for `record`
    pub fn from_record(base_url: &str, record: &Record) -> Self {
        Self {
            self_url: format!("{base_url}{}", record.id),
            id: record.id.clone(),
            name: record.name.clone(),
            title: record.title.clone(),
            publisher: normalize_publisher(&record.publisher),
            date: record.date.clone(),
        }
    }

    fn fields(&self) -> [&str; 6] {
        [
            self.self_url.as_str(),
            self.id.as_str(),
            self.name.as_str(),
            self.title.as_str(),
            self.publisher.as_str(),
            self.date.as_str(),
        ]
    }
}

/// CSV summary writer
pub struct SummarySink<W: Write> {
    writer: csv::Writer<W>,
    base_url: String,
    rows_written: usize,
}

impl SummarySink<File> {
    /// Create `path` (and its parent directory) and write the header row
    pub fn create(path: impl AsRef<Path>, base_url: impl Into<String>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::Output {
                message: format!("Failed to create directory {}: {e}", parent.display()),
            })?;
        }

        let file = File::create(path).map_err(|e| Error::Output {
            message: format!("Failed to create {}: {e}", path.display()),
        })?;
        Self::from_writer(file, base_url)
    }
}

impl<W: Write> SummarySink<W> {
    /// Wrap an arbitrary writer and write the header row
    pub fn from_writer(inner: W, base_url: impl Into<String>) -> Result<Self> {
        let mut writer = csv::Writer::from_writer(inner);
        writer.write_record(SUMMARY_HEADER)?;
        writer.flush()?;

        Ok(Self {
            writer,
            base_url: base_url.into(),
            rows_written: 0,
        })
    }

    /// Number of data rows written so far
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Append the row for one record
    pub fn write_record(&mut self, record: &Record) -> Result<()> {
        let row = SummaryRow::from_record(&self.base_url, record);
        self.writer.write_record(row.fields())?;
        self.rows_written += 1;
        Ok(())
    }

    /// Flush and return the underlying writer
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| Error::output(format!("Failed to flush summary: {}", e.error())))
    }
}

impl<W: Write + Send> PageSink for SummarySink<W> {
    fn write_page(&mut self, page: &Page) -> Result<usize> {
        for record in &page.records {
            self.write_record(record)?;
        }
        self.writer.flush()?;
        Ok(page.len())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Read a summary file back
pub fn read_summary(path: impl AsRef<Path>) -> Result<Vec<SummaryRow>> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open summary {}", path.display()))?;
    let rows = reader.deserialize().collect::<std::result::Result<Vec<SummaryRow>, _>>()?;
    Ok(rows)
}

/// Default location of the summary inside `output_dir`
pub fn summary_path(output_dir: impl AsRef<Path>, date: NaiveDate) -> PathBuf {
    output_dir.as_ref().join(summary_file_name(date))
}
