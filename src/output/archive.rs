//! Archive sink
//!
//! Writes each record's full entry as its own JSON document, named after the
//! record's display name.

use super::sink::PageSink;
use crate::error::{Error, Result, ResultExt};
use crate::types::{Page, Record};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// One-document-per-record JSON archive
#[derive(Debug)]
pub struct ArchiveSink {
    dir: PathBuf,
    dir_ready: bool,
    documents_written: usize,
}

impl ArchiveSink {
    /// Create a sink writing under `dir`; the directory is created on first use
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            dir_ready: false,
            documents_written: 0,
        }
    }

    /// Directory documents are written to
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of documents written so far
    pub fn documents_written(&self) -> usize {
        self.documents_written
    }

    /// Path the document for `record` is written to
    pub fn document_path(&self, record: &Record) -> PathBuf {
        self.dir.join(format!("{}.json", document_stem(record)))
    }

    /// Write one record, returning the document path
    pub fn write_record(&mut self, record: &Record) -> Result<PathBuf> {
        self.ensure_dir()?;

        let path = self.document_path(record);
        let file = File::create(&path).map_err(|e| Error::Output {
            message: format!("Failed to create {}: {e}", path.display()),
        })?;

        let mut writer = BufWriter::new(file);
        let mut serializer =
            Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"\t"));
        record.detail.serialize(&mut serializer)?;
        writer.flush()?;

        self.documents_written += 1;
        debug!("Archived {} to {}", record.id, path.display());
        Ok(path)
    }

    fn ensure_dir(&mut self) -> Result<()> {
        if !self.dir_ready {
            fs::create_dir_all(&self.dir).map_err(|e| Error::Output {
                message: format!("Failed to create directory {}: {e}", self.dir.display()),
            })?;
            self.dir_ready = true;
        }
        Ok(())
    }
}

impl PageSink for ArchiveSink {
    fn write_page(&mut self, page: &Page) -> Result<usize> {
        for record in &page.records {
            self.write_record(record)?;
        }
        Ok(page.len())
    }
}

/// Read an archived document back into a record
pub fn read_record(path: impl AsRef<Path>) -> Result<Record> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::Output {
        message: format!("Failed to open {}: {e}", path.display()),
    })?;
    let entry: serde_json::Value = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Invalid document {}", path.display()))?;
    Ok(Record::from_entry(entry))
}

/// File stem for a record: its name with path separators replaced, falling
/// back to the identifier when the name is blank
fn document_stem(record: &Record) -> String {
    let raw = if record.name.trim().is_empty() {
        record.id.trim()
    } else {
        record.name.trim()
    };

    let stem: String = raw
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    match stem.as_str() {
        "" => "unnamed".to_string(),
        "." | ".." => stem.replace('.', "_"),
        _ => stem,
    }
}
