//! Timer configuration
//!
//! Controls how reports are rendered and where timers built through
//! [`Timer::from_config`](crate::Timer::from_config) send them. Values come from
//! defaults, `TIMR_*` environment variables, or a TOML file.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, TimrError};
use crate::report::DEFAULT_PRECISION;
use crate::sink::{Sink, SinkKind};

pub const PRECISION_ENV: &str = "TIMR_PRECISION";
pub const SINK_ENV: &str = "TIMR_SINK";

/// Largest number of significant digits an `f64` can meaningfully carry.
pub const MAX_PRECISION: u32 = 17;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    /// Significant digits in reports (0 = full precision)
    pub precision: u32,

    /// Where reports go
    pub sink: SinkKind,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            sink: SinkKind::Stderr,
        }
    }
}

impl TimerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Build a configuration from a variable lookup, ignoring invalid values.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        config.apply_vars(lookup);
        config
    }

    /// Merge with environment variables (env vars take precedence)
    pub fn merge_with_env(self) -> Self {
        self.merge_with_vars(|name| std::env::var(name).ok())
    }

    /// Overlay the variables that are set; unset or invalid ones keep `self`.
    pub fn merge_with_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        self.apply_vars(lookup);
        self
    }

    fn apply_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(raw) = lookup(PRECISION_ENV) {
            match parse_precision(&raw) {
                Ok(precision) => self.precision = precision,
                Err(err) => tracing::warn!("ignoring {PRECISION_ENV}: {err}"),
            }
        }

        if let Some(raw) = lookup(SINK_ENV) {
            match raw.parse() {
                Ok(sink) => self.sink = sink,
                Err(err) => tracing::warn!("ignoring {SINK_ENV}: {err}"),
            }
        }
    }

    /// Precision as passed to reports; `None` means full precision.
    pub fn report_precision(&self) -> Option<u32> {
        (self.precision > 0).then_some(self.precision.min(MAX_PRECISION))
    }

    pub fn build_sink(&self) -> Box<dyn Sink + Send> {
        self.sink.build()
    }

    /// Load configuration from TOML file
    #[cfg(feature = "toml-config")]
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read timer config {}", path.display()))?;
        let config: TimerConfig = toml::from_str(&contents)
            .with_context(|| format!("failed to parse timer config {}", path.display()))?;
        if config.precision > MAX_PRECISION {
            return Err(TimrError::InvalidPrecision(config.precision.to_string()).into());
        }
        Ok(config)
    }

    #[cfg(not(feature = "toml-config"))]
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        anyhow::bail!(
            "cannot load timer config {}: timr was built without the `toml-config` feature",
            path.display()
        )
    }

    /// Save configuration to TOML file
    #[cfg(feature = "toml-config")]
    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    #[cfg(not(feature = "toml-config"))]
    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        anyhow::bail!(
            "cannot save timer config {}: timr was built without the `toml-config` feature",
            path.display()
        )
    }
}

/// Parse a precision setting: `1..=17`, or `0`/`full` for full precision.
pub fn parse_precision(raw: &str) -> Result<u32> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("full") {
        return Ok(0);
    }

    match trimmed.parse::<u32>() {
        Ok(digits) if digits <= MAX_PRECISION => Ok(digits),
        _ => Err(TimrError::InvalidPrecision(raw.to_string())),
    }
}
