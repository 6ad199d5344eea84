//! End-to-end analysis of one image.

use std::path::Path;

use image::DynamicImage;
use log::{debug, info, warn};
use undertone_utils::{UndertoneRule, crop_rect, load_image, timing_guard, to_grayscale};

use crate::analyzer::SkinAnalyzer;
use crate::detector::FaceDetector;
use crate::error::AnalysisError;
use crate::geometry::{BoundingBox, pad_and_clamp};
use crate::observer::{FaceObserver, NoopObserver};
use crate::result::{AnalysisResult, FaceResult};
use crate::undertone::undertone_for;

/// Decode the source image.
pub fn load_source<P: AsRef<Path>>(path: P) -> Result<DynamicImage, AnalysisError> {
    let path = path.as_ref();
    let _guard = timing_guard("undertone_core::decode", log::Level::Debug);
    load_image(path).map_err(|err| {
        debug!("{err:#}");
        AnalysisError::ImageRead {
            path: path.display().to_string(),
        }
    })
}

/// Detects faces, analyzes each padded crop and classifies its undertone.
///
/// Collaborators are supplied by the caller. Failures that affect a single
/// face are logged and that face is left out; only an unreadable image or an
/// empty detection set turn the whole run into an error result.
pub struct SkinToneAnalyzer {
    detector: Box<dyn FaceDetector>,
    analyzer: Box<dyn SkinAnalyzer>,
    observer: Box<dyn FaceObserver>,
    rule: UndertoneRule,
}

impl SkinToneAnalyzer {
    pub fn new(detector: Box<dyn FaceDetector>, analyzer: Box<dyn SkinAnalyzer>) -> Self {
        Self {
            detector,
            analyzer,
            observer: Box::new(NoopObserver),
            rule: UndertoneRule::default(),
        }
    }

    pub fn with_rule(mut self, rule: UndertoneRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn with_observer(mut self, observer: Box<dyn FaceObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Run the full analysis on an image file.
    pub fn analyze_path<P: AsRef<Path>>(&self, path: P) -> AnalysisResult {
        match load_source(path) {
            Ok(image) => self.analyze_image(&image),
            Err(err) => err.into(),
        }
    }

    /// Run detection and per-face analysis on a decoded image.
    pub fn analyze_image(&self, image: &DynamicImage) -> AnalysisResult {
        let _guard = timing_guard("undertone_core::analyze_image", log::Level::Debug);

        let boxes = {
            let _guard = timing_guard("undertone_core::detect", log::Level::Debug);
            self.detector.detect(&to_grayscale(image))
        };
        if boxes.is_empty() {
            return AnalysisError::NoFacesDetected.into();
        }
        info!("Detected {} face(s)", boxes.len());

        if let Err(err) = self.observer.on_detections(image, &boxes) {
            warn!("Face observer failed on detections: {err:#}");
        }

        let faces: Vec<FaceResult> = boxes
            .iter()
            .enumerate()
            .filter_map(|(index, bbox)| self.analyze_face(image, index + 1, bbox))
            .collect();
        faces.into()
    }

    /// Analyze one detected face. The crop is dropped when this returns.
    fn analyze_face(
        &self,
        image: &DynamicImage,
        face_id: usize,
        bbox: &BoundingBox,
    ) -> Option<FaceResult> {
        let _guard = timing_guard(format!("undertone_core::face[{face_id}]"), log::Level::Trace);

        let region = pad_and_clamp(*bbox, image.width(), image.height());
        if region.is_degenerate() {
            debug!("Face {face_id}: padded region {region:?} is empty, skipping");
            return None;
        }
        let crop = crop_rect(
            image,
            region.start_x,
            region.start_y,
            region.end_x,
            region.end_y,
        )?;

        if let Err(err) = self.observer.on_face(face_id, bbox, &region, &crop) {
            warn!("Face observer failed on face {face_id}: {err:#}");
        }

        let report = match self.analyzer.analyze(&crop) {
            Ok(report) => report,
            Err(err) => {
                warn!("Error analyzing face {face_id}: {err}");
                return None;
            }
        };

        let Some(entry) = report.faces.into_iter().next() else {
            debug!("Face {face_id}: analyzer returned no faces, skipping");
            return None;
        };
        let skin_tone = match entry.skin_tone {
            Some(tone) if !tone.is_empty() => tone,
            _ => {
                debug!("Face {face_id}: no skin tone in report, skipping");
                return None;
            }
        };
        let dominant_color = entry
            .dominant_colors
            .into_iter()
            .next()
            .map(|dominant| dominant.color)
            .unwrap_or_default();

        let undertone = undertone_for(self.rule, &skin_tone, &dominant_color);
        debug!("Face {face_id}: {skin_tone} / {dominant_color} -> {undertone}");

        Some(FaceResult {
            face_id,
            skin_tone,
            dominant_color,
            undertone,
            accuracy: entry.accuracy,
        })
    }
}
