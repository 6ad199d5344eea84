//! Shared configuration types consumed across the undertone workspace.
//!
//! These structures describe detector, analyzer, classifier and telemetry
//! settings. They serialize to JSON so a run can be reproduced from a file.

use crate::color::hex_to_rgb;

use anyhow::{Context, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::{
    env, fmt, fs,
    path::{Path, PathBuf},
};

/// Face detector parameters.
///
/// `scale_factor` and `min_neighbors` are the cascade-style detection
/// constants; the remaining fields tune the built-in SeetaFace backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DetectionSettings {
    /// Path to the detector model file.
    pub model_path: String,
    /// How much the image is scaled down between pyramid levels (> 1.0).
    pub scale_factor: f32,
    /// Minimum number of neighbouring candidates a face needs to be kept.
    pub min_neighbors: u32,
    /// Smallest face, in pixels, the detector will search for.
    pub min_face_size: u32,
    /// Classifier score a window must reach to count as a face.
    pub score_threshold: f64,
    /// Sliding window step in pixels (both axes).
    pub slide_window_step: u32,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            model_path: "models/seeta_fd_frontal_v1.0.bin".to_string(),
            scale_factor: 1.1,
            min_neighbors: 4,
            min_face_size: 20,
            score_threshold: 2.0,
            slide_window_step: 4,
        }
    }
}

impl DetectionSettings {
    /// Pyramid step expected by SeetaFace (a shrink ratio in `(0, 1)`).
    pub fn pyramid_scale(&self) -> f32 {
        1.0 / self.scale_factor
    }

    /// True when `min_neighbors` differs from the default. SeetaFace merges
    /// overlapping windows itself, so the value only matters to other backends.
    pub fn has_custom_min_neighbors(&self) -> bool {
        self.min_neighbors != Self::default().min_neighbors
    }
}

/// Parameters for the built-in palette skin analyzer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Number of dominant colors extracted from the skin pixels.
    pub n_dominant_colors: usize,
    /// Reference skin tones, as `#RRGGBB` strings.
    pub palette: Vec<String>,
    /// Labels for each palette entry (same length as `palette`).
    pub tone_labels: Vec<String>,
    /// Below this many skin-mask pixels the whole crop is clustered instead.
    pub min_skin_pixels: usize,
    /// Maximum k-means iterations.
    pub max_iterations: usize,
    /// k-means convergence threshold.
    pub convergence: f32,
    /// Seed for k-means initialisation, fixed so runs are reproducible.
    pub seed: u64,
}

/// Default skin tone palette for color images.
pub const DEFAULT_PALETTE: [&str; 11] = [
    "#373028", "#422811", "#513B2E", "#6F503C", "#81654F", "#9D7A54", "#BEA07E", "#E5C8A6",
    "#E7C1B8", "#F3DAD6", "#FBF2F3",
];

/// Labels matching [`DEFAULT_PALETTE`].
pub const DEFAULT_TONE_LABELS: [&str; 11] = [
    "CA", "CB", "CC", "CD", "CE", "CF", "CG", "CH", "CI", "CJ", "CK",
];

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            n_dominant_colors: 2,
            palette: DEFAULT_PALETTE.iter().map(|s| s.to_string()).collect(),
            tone_labels: DEFAULT_TONE_LABELS.iter().map(|s| s.to_string()).collect(),
            min_skin_pixels: 32,
            max_iterations: 20,
            convergence: 1e-4,
            seed: 0,
        }
    }
}

/// Which color rule derives the undertone label.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum UndertoneRule {
    /// Scaled red vs blue comparison on the dominant color.
    #[default]
    ScaledRgb,
    /// Superseded CIELAB a/b comparison on the skin tone color.
    LegacyLab,
}

impl fmt::Display for UndertoneRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UndertoneRule::ScaledRgb => "scaled_rgb",
            UndertoneRule::LegacyLab => "legacy_lab",
        })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct UndertoneSettings {
    pub rule: UndertoneRule,
}

/// Settings controlling optional runtime telemetry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TelemetrySettings {
    /// Whether telemetry timing logs are enabled.
    pub enabled: bool,
    /// Logging level for telemetry output (error, warn, info, debug, trace).
    pub level: String,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            enabled: false,
            level: "debug".to_string(),
        }
    }
}

impl TelemetrySettings {
    /// Resolve the configured level string into a `LevelFilter`.
    pub fn level_filter(&self) -> LevelFilter {
        match self.level.trim().to_ascii_lowercase().as_str() {
            "off" => LevelFilter::Off,
            "error" => LevelFilter::Error,
            "warn" | "warning" => LevelFilter::Warn,
            "info" => LevelFilter::Info,
            "trace" => LevelFilter::Trace,
            _ => LevelFilter::Debug,
        }
    }
}

/// Application settings shared by the library and the CLI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct AppSettings {
    pub detection: DetectionSettings,
    pub analysis: AnalysisSettings,
    pub undertone: UndertoneSettings,
    pub telemetry: TelemetrySettings,
    /// When set, an annotated copy of each analyzed image is written here.
    pub annotate_dir: Option<PathBuf>,
}

impl AppSettings {
    /// Load settings from a JSON file. Missing sections fall back to defaults.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        let settings: AppSettings = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse settings JSON at {}", path.display()))?;
        settings
            .validate()
            .with_context(|| format!("invalid settings in {}", path.display()))?;
        Ok(settings)
    }

    /// Serialize settings to disk in pretty-printed JSON, overwriting any existing file.
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let payload =
            serde_json::to_string_pretty(self).context("failed to serialize settings JSON")?;
        fs::write(path, payload)
            .with_context(|| format!("failed to write settings file {}", path.display()))?;
        Ok(())
    }

    /// Reject values the detector or analyzer cannot work with.
    pub fn validate(&self) -> Result<()> {
        let detection = &self.detection;
        anyhow::ensure!(
            detection.scale_factor.is_finite() && detection.scale_factor > 1.0,
            "detection.scale_factor must be greater than 1.0 (got {})",
            detection.scale_factor
        );
        anyhow::ensure!(
            detection.slide_window_step > 0,
            "detection.slide_window_step must be non-zero"
        );
        anyhow::ensure!(
            detection.min_face_size >= 20,
            "detection.min_face_size must be at least 20 pixels (got {})",
            detection.min_face_size
        );

        let analysis = &self.analysis;
        anyhow::ensure!(
            analysis.n_dominant_colors > 0 && analysis.n_dominant_colors <= 255,
            "analysis.n_dominant_colors must be between 1 and 255 (got {})",
            analysis.n_dominant_colors
        );
        anyhow::ensure!(
            !analysis.palette.is_empty(),
            "analysis.palette must contain at least one color"
        );
        anyhow::ensure!(
            analysis.palette.len() == analysis.tone_labels.len(),
            "analysis.palette has {} colors but {} tone labels",
            analysis.palette.len(),
            analysis.tone_labels.len()
        );
        for color in &analysis.palette {
            hex_to_rgb(color).with_context(|| format!("invalid palette color '{color}'"))?;
        }
        Ok(())
    }
}

/// Returns the default settings path, `config/undertone_settings.json` under the
/// working directory.
pub fn default_settings_path() -> PathBuf {
    env::current_dir()
        .map(|dir| dir.join("config/undertone_settings.json"))
        .unwrap_or_else(|_| PathBuf::from("config/undertone_settings.json"))
}
