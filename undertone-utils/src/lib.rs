//! Common helpers shared across the undertone crates.

/// Hex/RGB color parsing and formatting.
pub mod color;
/// Application configuration and settings management.
pub mod config;
/// Test fixture loading and path resolution.
pub mod fixtures;
/// Image loading, grayscale conversion and region extraction.
pub mod image_utils;
/// Instrumentation helpers for optional performance tracing.
pub mod telemetry;

use anyhow::Result;
use log::LevelFilter;

pub use color::{ColorError, RgbColor, hex_to_rgb, to_hex};
pub use config::{
    AnalysisSettings, AppSettings, DetectionSettings, TelemetrySettings, UndertoneRule,
    UndertoneSettings, default_settings_path,
};
pub use fixtures::{fixture_path, fixtures_dir, load_fixture_json};
pub use image_utils::{crop_rect, load_image, to_grayscale};
pub use telemetry::{
    TimingGuard, configure as configure_telemetry, telemetry_allows, telemetry_enabled,
    telemetry_level, timing_guard, timing_guard_if,
};

/// Initialize logging once for the CLI and for tests.
///
/// Respects `RUST_LOG` when it is set and otherwise falls back to
/// `default_filter`. Output goes to stderr so stdout stays reserved for the
/// JSON result document.
pub fn init_logging(default_filter: LevelFilter) -> Result<()> {
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_filter.as_str()),
    );
    builder.target(env_logger::Target::Stderr);
    builder.filter_module("undertone::telemetry", LevelFilter::Trace);

    if builder.try_init().is_err() {
        // Logger already initialized; nothing to do.
    }
    Ok(())
}
