//! Skin tone and undertone analysis of faces in a still image.
//!
//! The pipeline detects faces, pads and clamps each box, runs a skin analyzer
//! on the crop and classifies the undertone of the dominant color.

/// Skin analyzer trait and its report types.
pub mod analyzer;
/// Face detector trait and the SeetaFace backend.
pub mod detector;
/// Run-level errors.
pub mod error;
/// Bounding box padding and clamping.
pub mod geometry;
/// Hooks for observing detections and crops.
pub mod observer;
/// Orchestration of a single run.
pub mod pipeline;
/// Result document and JSON output.
pub mod result;
/// Built-in palette-matching skin analyzer.
pub mod skin;
/// Undertone classification rules.
pub mod undertone;

pub use analyzer::{AnalyzerError, DominantColor, ReportFace, SkinAnalyzer, SkinReport};
#[cfg(feature = "seeta")]
pub use detector::SeetaFaceDetector;
pub use detector::FaceDetector;
pub use error::AnalysisError;
pub use geometry::{BoundingBox, FACE_PADDING, PaddedRegion, pad_and_clamp};
pub use observer::{FaceObserver, NoopObserver};
pub use pipeline::{SkinToneAnalyzer, load_source};
pub use result::{AnalysisResult, FaceResult};
pub use skin::PaletteSkinAnalyzer;
pub use undertone::{
    Undertone, classify_undertone, classify_undertone_lab, get_undertone, undertone_for,
};

/// Returns the crate version for diagnostics.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
