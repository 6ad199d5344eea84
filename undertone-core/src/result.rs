//! Run result and its JSON form.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::undertone::Undertone;

/// Analysis outcome for one face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceResult {
    /// 1-based position of the face in detector output.
    pub face_id: usize,
    pub skin_tone: String,
    pub dominant_color: String,
    pub undertone: Undertone,
    pub accuracy: f64,
}

/// The single document a run produces.
///
/// Serializes as either `{"error": "..."}` or `{"faces": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisResult {
    Error { error: String },
    Faces { faces: Vec<FaceResult> },
}

impl AnalysisResult {
    pub fn error(message: impl Into<String>) -> Self {
        AnalysisResult::Error {
            error: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, AnalysisResult::Error { .. })
    }

    /// Analyzed faces, empty for an error result.
    pub fn faces(&self) -> &[FaceResult] {
        match self {
            AnalysisResult::Faces { faces } => faces,
            AnalysisResult::Error { .. } => &[],
        }
    }

    /// Compact single-line JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Write the JSON document followed by a newline.
    pub fn write_json<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        serde_json::to_writer(&mut writer, self)?;
        writeln!(writer)?;
        writer.flush()
    }
}

impl From<AnalysisError> for AnalysisResult {
    fn from(err: AnalysisError) -> Self {
        AnalysisResult::error(err.to_string())
    }
}

impl From<Vec<FaceResult>> for AnalysisResult {
    fn from(faces: Vec<FaceResult>) -> Self {
        AnalysisResult::Faces { faces }
    }
}
