//! Destinations for finalized timer reports.

use std::io::{self, Write};
use std::str::FromStr;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::TimrError;
use crate::report::Report;

/// Receives the report of a timer when it is finalized.
pub trait Sink {
    fn emit(&mut self, report: &Report);
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn emit(&mut self, report: &Report) {
        (**self).emit(report);
    }
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn emit(&mut self, report: &Report) {
        (**self).emit(report);
    }
}

/// Writes reports to the process standard error stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrSink;

impl Sink for StderrSink {
    fn emit(&mut self, report: &Report) {
        // Diagnostics are best-effort; a closed stderr must not abort the caller.
        let _ = writeln!(io::stderr().lock(), "{report}");
    }
}

/// Writes reports, one per line, to any writer.
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Sink for WriterSink<W> {
    fn emit(&mut self, report: &Report) {
        let _ = writeln!(self.writer, "{report}");
        let _ = self.writer.flush();
    }
}

/// Forwards reports to `tracing` as `info` events on the `timr` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl Sink for TracingSink {
    fn emit(&mut self, report: &Report) {
        tracing::info!(
            target: "timr",
            value = report.value(),
            unit = report.label(),
            elapsed_ns = report.elapsed().as_nanos() as u64,
            "{report}"
        );
    }
}

/// Keeps reports in shared memory. Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    reports: Arc<Mutex<Vec<Report>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<Report> {
        self.reports.lock().clone()
    }

    /// Reports rendered the way the line-oriented sinks print them.
    pub fn lines(&self) -> Vec<String> {
        self.reports.lock().iter().map(|r| r.to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.reports.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.lock().is_empty()
    }

    pub fn clear(&self) {
        self.reports.lock().clear();
    }
}

impl Sink for MemorySink {
    fn emit(&mut self, report: &Report) {
        self.reports.lock().push(report.clone());
    }
}

/// Sink selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    #[default]
    Stderr,
    Tracing,
}

impl SinkKind {
    pub fn build(self) -> Box<dyn Sink + Send> {
        match self {
            SinkKind::Stderr => Box::new(StderrSink),
            SinkKind::Tracing => Box::new(TracingSink),
        }
    }
}

impl FromStr for SinkKind {
    type Err = TimrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stderr" => Ok(SinkKind::Stderr),
            "tracing" | "log" => Ok(SinkKind::Tracing),
            _ => Err(TimrError::UnknownSink(s.to_string())),
        }
    }
}
