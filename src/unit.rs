//! Duration units a [`Timer`](crate::Timer) can report in.
//!
//! Units are zero-sized tags selected through a type parameter, so the scale
//! and label are fixed when the timer is declared.

use std::time::Duration;

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::Nanoseconds {}
    impl Sealed for super::Microseconds {}
    impl Sealed for super::Milliseconds {}
    impl Sealed for super::Seconds {}
}

/// A duration unit: a scale relative to one second plus a display label.
///
/// Sealed; the four units in this module are the only implementations.
pub trait Unit: sealed::Sealed + 'static {
    /// Length of one unit in seconds (`1e-3` for milliseconds).
    const SCALE: f64;

    /// Number of nanoseconds in one unit.
    const NANOS_PER_UNIT: f64;

    /// Label appended to the numeric value in reports.
    const LABEL: &'static str;

    /// Express `duration` as a real number of this unit.
    fn convert(duration: Duration) -> f64 {
        duration.as_nanos() as f64 / Self::NANOS_PER_UNIT
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Nanoseconds;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Microseconds;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Milliseconds;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Seconds;

impl Unit for Nanoseconds {
    const SCALE: f64 = 1e-9;
    const NANOS_PER_UNIT: f64 = 1.0;
    const LABEL: &'static str = "nanoseconds";
}

impl Unit for Microseconds {
    const SCALE: f64 = 1e-6;
    const NANOS_PER_UNIT: f64 = 1e3;
    const LABEL: &'static str = "microseconds";
}

impl Unit for Milliseconds {
    const SCALE: f64 = 1e-3;
    const NANOS_PER_UNIT: f64 = 1e6;
    const LABEL: &'static str = "milliseconds";
}

impl Unit for Seconds {
    const SCALE: f64 = 1.0;
    const NANOS_PER_UNIT: f64 = 1e9;
    const LABEL: &'static str = "seconds";
}
