//! Scoped interval timing.
//!
//! [`Timer`] measures monotonic time over a scope, can be paused and resumed,
//! and reports the total in a compile-time [`Unit`] when it is dropped.

pub mod config;
pub mod error;
pub mod logger;
pub mod report;
pub mod sink;
pub mod timer;
pub mod unit;

pub use crate::config::TimerConfig;
pub use crate::error::TimrError;
pub use crate::report::Report;
pub use crate::sink::{MemorySink, Sink, SinkKind, StderrSink, TracingSink, WriterSink};
pub use crate::timer::{Timer, measure, measure_with};
pub use crate::unit::{Microseconds, Milliseconds, Nanoseconds, Seconds, Unit};
