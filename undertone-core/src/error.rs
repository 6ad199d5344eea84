use thiserror::Error;

/// Failures that end a run before any face is analyzed.
///
/// The display strings are the `error` field of the emitted result and are
/// matched by callers, so they must not change.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("Could not read image {path}")]
    ImageRead { path: String },

    #[error("No faces detected in the image")]
    NoFacesDetected,
}
