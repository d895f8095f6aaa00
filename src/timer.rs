//! Scoped interval timer.
//!
//! A [`Timer`] starts running when it is created and reports the measured time
//! exactly once, when it is dropped or explicitly [finished](Timer::finish).
//!
//! ```
//! use timr::{Milliseconds, Timer};
//!
//! let mut timer = Timer::<Milliseconds>::new();
//! timer.pause();
//! // not measured
//! timer.resume();
//! // prints e.g. `0.0042milliseconds` to stderr when `timer` goes out of scope
//! ```
//!
//! # Reset while paused
//!
//! [`Timer::reset`] clears the accumulated time but keeps the paused flag. A
//! paused timer that is reset stays paused and reports zero until
//! [`Timer::resume`] is called.

use std::fmt;
use std::marker::PhantomData;
use std::time::{Duration, Instant};

use crate::config::TimerConfig;
use crate::report::{DEFAULT_PRECISION, Report};
use crate::sink::{Sink, StderrSink};
use crate::unit::{Seconds, Unit};

pub struct Timer<U: Unit = Seconds, S: Sink = StderrSink> {
    start_mark: Instant,
    accumulated: Duration,
    paused: bool,
    finished: bool,
    precision: Option<u32>,
    sink: S,
    unit: PhantomData<U>,
}

impl<U: Unit> Timer<U, StderrSink> {
    /// Start a timer that reports to standard error.
    pub fn new() -> Self {
        Self::with_sink(StderrSink)
    }

    /// Start a timer using the sink and precision from `config`.
    pub fn from_config(config: &TimerConfig) -> Timer<U, Box<dyn Sink + Send>> {
        Timer::with_sink(config.build_sink()).with_precision(config.report_precision())
    }
}

impl<U: Unit> Default for Timer<U, StderrSink> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U: Unit, S: Sink> Timer<U, S> {
    /// Start a timer that reports to `sink`.
    pub fn with_sink(sink: S) -> Self {
        tracing::trace!(unit = U::LABEL, "timer started");
        Self {
            start_mark: Instant::now(),
            accumulated: Duration::ZERO,
            paused: false,
            finished: false,
            precision: Some(DEFAULT_PRECISION),
            sink,
            unit: PhantomData,
        }
    }

    /// Significant digits used in the report; `None` prints full precision.
    pub fn with_precision(mut self, precision: Option<u32>) -> Self {
        self.precision = precision;
        self
    }

    /// Stop accruing time. No-op if already paused.
    pub fn pause(&mut self) {
        if !self.paused {
            self.accumulated += self.start_mark.elapsed();
            self.paused = true;
            tracing::trace!(unit = U::LABEL, accumulated = ?self.accumulated, "timer paused");
        }
    }

    /// Start accruing time again. No-op if running.
    pub fn resume(&mut self) {
        if self.paused {
            self.start_mark = Instant::now();
            self.paused = false;
            tracing::trace!(unit = U::LABEL, "timer resumed");
        }
    }

    /// Discard all accumulated time and restart the current segment now.
    ///
    /// The paused flag is left untouched: a paused timer must still be
    /// resumed before it accrues time again.
    pub fn reset(&mut self) {
        self.start_mark = Instant::now();
        self.accumulated = Duration::ZERO;
        tracing::trace!(unit = U::LABEL, paused = self.paused, "timer reset");
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Time measured so far, including the running segment.
    pub fn elapsed(&self) -> Duration {
        if self.paused {
            self.accumulated
        } else {
            self.accumulated + self.start_mark.elapsed()
        }
    }

    /// [`elapsed`](Self::elapsed) expressed in the timer's unit.
    pub fn elapsed_in_unit(&self) -> f64 {
        U::convert(self.elapsed())
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Finalize now, emit the report and return it.
    pub fn finish(mut self) -> Report {
        self.finalize()
    }

    fn finalize(&mut self) -> Report {
        let report = Report::new::<U>(self.elapsed(), self.precision);
        self.finished = true;
        self.sink.emit(&report);
        report
    }
}

impl<U: Unit, S: Sink> Drop for Timer<U, S> {
    fn drop(&mut self) {
        if !self.finished {
            let _ = self.finalize();
        }
    }
}

impl<U: Unit, S: Sink> fmt::Debug for Timer<U, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timer")
            .field("unit", &U::LABEL)
            .field("start_mark", &self.start_mark)
            .field("accumulated", &self.accumulated)
            .field("paused", &self.paused)
            .field("precision", &self.precision)
            .finish_non_exhaustive()
    }
}

/// Run `f` with a fresh timer that reports to standard error when `f` returns
/// or unwinds.
pub fn measure<U: Unit, T>(f: impl FnOnce(&mut Timer<U>) -> T) -> T {
    let mut timer = Timer::<U>::new();
    f(&mut timer)
}

/// Like [`measure`], reporting to `sink`.
pub fn measure_with<U: Unit, S: Sink, T>(sink: S, f: impl FnOnce(&mut Timer<U, S>) -> T) -> T {
    let mut timer = Timer::<U, S>::with_sink(sink);
    f(&mut timer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{MemorySink, SinkKind};
    use crate::unit::{Microseconds, Milliseconds, Nanoseconds};
    use std::thread::sleep;

    #[test]
    fn test_drop_reports_once() {
        let sink = MemorySink::new();
        {
            let _timer = Timer::<Seconds, _>::with_sink(sink.clone());
        }

        let reports = sink.reports();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].label(), "seconds");
        assert!(reports[0].value() >= 0.0);
        assert!(sink.lines()[0].ends_with("seconds"));
    }

    #[test]
    fn test_finish_then_drop_reports_once() {
        let sink = MemorySink::new();
        let timer = Timer::<Microseconds, _>::with_sink(sink.clone());
        let report = timer.finish();

        assert_eq!(sink.reports(), vec![report]);
    }

    #[test]
    fn test_unit_scale_is_consistent() {
        let nanos = Timer::<Nanoseconds, _>::with_sink(MemorySink::new());
        let seconds = Timer::<Seconds, _>::with_sink(MemorySink::new());
        sleep(Duration::from_millis(10));
        let seconds = seconds.finish();
        let nanos = nanos.finish();

        assert!(seconds.value() >= 0.01 && seconds.value() < 1.0);
        assert!(nanos.value() >= 1e7);
        // `nanos` started first and finished last, so it covers at least as much.
        assert!(nanos.value() >= seconds.value() * 1e9 * 0.999_999);
    }

    #[test]
    fn test_sleep_is_measured_in_seconds() {
        let sink = MemorySink::new();
        {
            let _timer = Timer::<Seconds, _>::with_sink(sink.clone());
            sleep(Duration::from_millis(100));
        }

        let report = &sink.reports()[0];
        assert_eq!(report.label(), "seconds");
        assert!(report.value() >= 0.1, "got {}", report.value());
        assert!(report.value() < 0.5, "got {}", report.value());
    }

    #[test]
    fn test_paused_sleep_is_not_measured() {
        let mut timer = Timer::<Milliseconds, _>::with_sink(MemorySink::new());
        timer.pause();
        sleep(Duration::from_millis(100));
        timer.resume();
        let report = timer.finish();

        assert!(report.value() < 50.0, "got {}", report.value());
    }

    #[test]
    fn test_pause_is_idempotent() {
        let mut timer = Timer::<Nanoseconds, _>::with_sink(MemorySink::new());
        sleep(Duration::from_millis(2));
        timer.pause();
        let frozen = timer.elapsed();

        sleep(Duration::from_millis(5));
        timer.pause();
        assert!(timer.is_paused());
        assert_eq!(timer.elapsed(), frozen);
        assert_eq!(timer.finish().elapsed(), frozen);
    }

    #[test]
    fn test_resume_is_idempotent() {
        let mut timer = Timer::<Milliseconds, _>::with_sink(MemorySink::new());
        timer.pause();
        timer.resume();
        sleep(Duration::from_millis(20));

        // A second resume must not move the start of the running segment.
        timer.resume();
        assert!(!timer.is_paused());
        assert!(timer.finish().value() >= 20.0);
    }

    #[test]
    fn test_time_outside_pause_window_is_counted() {
        let mut timer = Timer::<Milliseconds, _>::with_sink(MemorySink::new());
        sleep(Duration::from_millis(20));
        timer.pause();
        sleep(Duration::from_millis(50));
        timer.resume();
        sleep(Duration::from_millis(20));
        let value = timer.finish().value();

        assert!(value >= 40.0, "got {value}");
        assert!(value < 90.0, "got {value}");
    }

    #[test]
    fn test_reset_discards_accumulated_time() {
        let mut timer = Timer::<Milliseconds, _>::with_sink(MemorySink::new());
        sleep(Duration::from_millis(30));
        timer.reset();
        let value = timer.finish().value();

        assert!(value < 10.0, "got {value}");
    }

    #[test]
    fn test_reset_while_paused_stays_paused() {
        let sink = MemorySink::new();
        let mut timer = Timer::<Nanoseconds, _>::with_sink(sink.clone());
        sleep(Duration::from_millis(5));
        timer.pause();
        timer.reset();
        assert!(timer.is_paused());

        sleep(Duration::from_millis(5));
        drop(timer);

        let report = &sink.reports()[0];
        assert_eq!(report.elapsed(), Duration::ZERO);
        assert_eq!(sink.lines()[0], "0nanoseconds");
    }

    #[test]
    fn test_pause_then_drop_does_not_count_paused_time() {
        let mut timer = Timer::<Milliseconds, _>::with_sink(MemorySink::new());
        timer.pause();
        let frozen = timer.elapsed();
        sleep(Duration::from_millis(30));

        assert_eq!(timer.finish().elapsed(), frozen);
    }

    #[test]
    fn test_early_return_still_reports() {
        fn fallible(sink: MemorySink, fail: bool) -> Result<u32, &'static str> {
            let _timer = Timer::<Microseconds, _>::with_sink(sink);
            if fail {
                return Err("bail");
            }
            Ok(1)
        }

        let sink = MemorySink::new();
        assert!(fallible(sink.clone(), true).is_err());
        assert_eq!(fallible(sink.clone(), false), Ok(1));
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn test_measure_with_returns_closure_value() {
        let sink = MemorySink::new();
        let answer = measure_with::<Milliseconds, _, _>(sink.clone(), |timer| {
            timer.pause();
            42
        });

        assert_eq!(answer, 42);
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.reports()[0].label(), "milliseconds");
    }

    #[test]
    fn test_measure_with_reports_when_closure_panics() {
        let sink = MemorySink::new();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            measure_with::<Milliseconds, _, u32>(sink.clone(), |_timer| panic!("interrupted"))
        }));

        assert!(result.is_err());
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.reports()[0].label(), "milliseconds");
    }

    #[test]
    fn test_from_config_uses_configured_sink_kind() {
        let timer = Timer::<Milliseconds>::from_config(&TimerConfig::default());
        assert!(!timer.is_paused());
        let report = timer.finish();
        assert_eq!(report.label(), "milliseconds");
        assert_eq!(report.precision(), Some(DEFAULT_PRECISION));

        let config = TimerConfig {
            precision: 0,
            sink: SinkKind::Tracing,
        };
        assert_eq!(Timer::<Nanoseconds>::from_config(&config).finish().precision(), None);
    }

    #[test]
    fn test_precision_is_applied_to_reports() {
        let timer = Timer::<Seconds, _>::with_sink(MemorySink::new()).with_precision(None);
        assert_eq!(timer.finish().precision(), None);

        let config = TimerConfig {
            precision: 3,
            sink: SinkKind::Stderr,
        };
        let timer = Timer::<Seconds>::from_config(&config);
        assert_eq!(timer.finish().precision(), Some(3));
    }

    #[test]
    fn test_default_timer_reports_to_stderr() {
        let timer = Timer::<Seconds>::default();
        assert!(!timer.is_paused());
        assert!(timer.elapsed_in_unit() >= 0.0);
        assert!(!measure::<Nanoseconds, _>(|timer| timer.is_paused()));
    }
}
