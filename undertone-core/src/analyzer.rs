use image::DynamicImage;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure inside a skin analyzer. Scoped to a single face.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("face crop has no pixels")]
    EmptyImage,

    #[error("skin analysis failed: {0}")]
    Failed(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// One color cluster and its share of the analyzed pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DominantColor {
    /// `#RRGGBB`
    pub color: String,
    /// Share in `0.0..=1.0`.
    #[serde(default)]
    pub percent: f64,
}

/// Per-face entry of a [`SkinReport`].
///
/// Every field is optional on the wire so a partial report from an external
/// analyzer still deserializes; the pipeline decides what is usable.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportFace {
    /// Closest palette tone, `#RRGGBB`.
    pub skin_tone: Option<String>,
    /// Palette label of `skin_tone`.
    pub tone_label: Option<String>,
    /// Clusters ordered by share, largest first.
    pub dominant_colors: Vec<DominantColor>,
    /// Match confidence, passed through unchanged.
    pub accuracy: f64,
}

/// Analyzer response for one face crop.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SkinReport {
    pub faces: Vec<ReportFace>,
}

/// Skin tone and dominant color extraction for a cropped face.
///
/// Implementations receive an owned crop that lives only for the call and
/// may be invoked once per detected face in a run.
pub trait SkinAnalyzer: Send + Sync {
    fn analyze(&self, face: &DynamicImage) -> Result<SkinReport, AnalyzerError>;
}

impl<T: SkinAnalyzer + ?Sized> SkinAnalyzer for Box<T> {
    fn analyze(&self, face: &DynamicImage) -> Result<SkinReport, AnalyzerError> {
        (**self).analyze(face)
    }
}
