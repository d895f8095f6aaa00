use std::fmt;
use std::time::Duration;

use crate::unit::Unit;

/// Significant digits used when rendering a report, unless configured otherwise.
pub const DEFAULT_PRECISION: u32 = 6;

/// The result of finalizing a [`Timer`](crate::Timer).
///
/// Renders as the value immediately followed by the unit label, e.g.
/// `1.50045seconds`.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    elapsed: Duration,
    value: f64,
    label: &'static str,
    precision: Option<u32>,
}

impl Report {
    pub fn new<U: Unit>(elapsed: Duration, precision: Option<u32>) -> Self {
        Self {
            elapsed,
            value: U::convert(elapsed),
            label: U::LABEL,
            precision,
        }
    }

    /// Total measured time.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Measured time in the timer's unit, unrounded.
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn precision(&self) -> Option<u32> {
        self.precision
    }

    /// The value as it is printed, after significant-digit rounding.
    pub fn display_value(&self) -> f64 {
        match self.precision {
            Some(digits) => round_significant(self.value, digits),
            None => self.value,
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.display_value(), self.label)
    }
}

/// Round `value` to `digits` significant digits.
fn round_significant(value: f64, digits: u32) -> f64 {
    if value == 0.0 || !value.is_finite() || digits == 0 {
        return value;
    }

    let magnitude = value.abs().log10().floor() as i32;
    let shift = digits as i32 - 1 - magnitude;

    // Only divide/multiply by exact powers of ten so short decimals survive.
    if shift >= 0 {
        let factor = 10f64.powi(shift);
        (value * factor).round() / factor
    } else {
        let factor = 10f64.powi(-shift);
        (value / factor).round() * factor
    }
}
