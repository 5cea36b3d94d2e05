//! Page sink abstraction
//!
//! Sinks receive every accepted page, in walk order, from the single task
//! driving the walk.

use crate::error::Result;
use crate::types::Page;

/// Destination for accepted pages
pub trait PageSink: Send {
    /// Persist every record of `page`, returning how many were written
    fn write_page(&mut self, page: &Page) -> Result<usize>;

    /// Flush anything still buffered
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Forwards each page to several sinks in order
#[derive(Default)]
pub struct SinkSet {
    sinks: Vec<Box<dyn PageSink>>,
}

impl SinkSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sink
    #[must_use]
    pub fn with(mut self, sink: impl PageSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    /// Number of sinks in the set
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// True when no sink is registered
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl PageSink for SinkSet {
    fn write_page(&mut self, page: &Page) -> Result<usize> {
        for sink in &mut self.sinks {
            sink.write_page(page)?;
        }
        Ok(page.len())
    }

    fn finish(&mut self) -> Result<()> {
        for sink in &mut self.sinks {
            sink.finish()?;
        }
        Ok(())
    }
}
