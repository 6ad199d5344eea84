//! Scoped timing logs for the analysis pipeline.
//!
//! A [`TimingGuard`] records when it was created and, if telemetry is
//! switched on for its level, logs the elapsed time on the
//! `undertone::telemetry` target when dropped. Telemetry is off until
//! [`configure`] is called, so guards cost one atomic load in normal runs.

use std::{
    borrow::Cow,
    sync::atomic::{AtomicU8, Ordering},
    time::{Duration, Instant},
};

use log::{Level, LevelFilter, log, log_enabled};

const TARGET: &str = "undertone::telemetry";

/// Highest level telemetry may log at; 0 means disabled.
static THRESHOLD: AtomicU8 = AtomicU8::new(0);

/// Logs how long a scope took when dropped.
pub struct TimingGuard {
    label: Cow<'static, str>,
    level: Level,
    start: Instant,
    active: bool,
}

impl TimingGuard {
    /// Returns `true` when the guard will emit a log entry on drop.
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Consume the guard and return the elapsed duration without logging.
    pub fn finish(mut self) -> Duration {
        self.active = false;
        self.start.elapsed()
    }
}

impl Drop for TimingGuard {
    fn drop(&mut self) {
        if self.active {
            log!(
                target: TARGET,
                self.level,
                "{} completed in {:.2?}",
                self.label,
                self.start.elapsed()
            );
        }
    }
}

/// Create a guard that is active whenever telemetry allows `level`.
pub fn timing_guard(label: impl Into<Cow<'static, str>>, level: Level) -> TimingGuard {
    timing_guard_if(label, level, true)
}

/// Like [`timing_guard`], but also gated on a caller-supplied flag.
pub fn timing_guard_if(
    label: impl Into<Cow<'static, str>>,
    level: Level,
    enabled: bool,
) -> TimingGuard {
    let active = enabled && telemetry_allows(level) && log_enabled!(target: TARGET, level);
    TimingGuard {
        label: label.into(),
        level,
        start: Instant::now(),
        active,
    }
}

/// Set the global telemetry state. `enabled == false` or `LevelFilter::Off` disables it.
pub fn configure(enabled: bool, level: LevelFilter) {
    let threshold = if enabled { level as usize as u8 } else { 0 };
    THRESHOLD.store(threshold, Ordering::Relaxed);
}

pub fn telemetry_enabled() -> bool {
    THRESHOLD.load(Ordering::Relaxed) > 0
}

/// Returns the maximum telemetry level, `Off` when disabled.
pub fn telemetry_level() -> LevelFilter {
    match THRESHOLD.load(Ordering::Relaxed) {
        1 => LevelFilter::Error,
        2 => LevelFilter::Warn,
        3 => LevelFilter::Info,
        4 => LevelFilter::Debug,
        5 => LevelFilter::Trace,
        _ => LevelFilter::Off,
    }
}

/// Returns `true` when telemetry is enabled and `level` is within the threshold.
pub fn telemetry_allows(level: Level) -> bool {
    level <= telemetry_level()
}
