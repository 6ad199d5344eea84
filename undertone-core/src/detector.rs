//! Face detection collaborator.

use image::GrayImage;

use crate::geometry::BoundingBox;

/// Finds faces in a grayscale image.
///
/// Boxes are returned in detector order. Callers must not assume that order is
/// stable across backends or backend versions.
pub trait FaceDetector: Send + Sync {
    fn detect(&self, gray: &GrayImage) -> Vec<BoundingBox>;
}

impl<T: FaceDetector + ?Sized> FaceDetector for Box<T> {
    fn detect(&self, gray: &GrayImage) -> Vec<BoundingBox> {
        (**self).detect(gray)
    }
}

#[cfg(feature = "seeta")]
pub use seeta::SeetaFaceDetector;

#[cfg(feature = "seeta")]
mod seeta {
    use std::{fs::File, io::BufReader, path::Path};

    use anyhow::{Context, Result};
    use image::GrayImage;
    use log::debug;
    use undertone_utils::{DetectionSettings, timing_guard};

    use super::FaceDetector;
    use crate::geometry::BoundingBox;

    /// SeetaFace frontal detector from the `rustface` crate.
    ///
    /// The model is parsed once; every call builds a fresh detector from a
    /// clone of it because `rustface` detectors are stateful and not `Sync`.
    pub struct SeetaFaceDetector {
        model: rustface::Model,
        settings: DetectionSettings,
    }

    impl SeetaFaceDetector {
        /// Load a SeetaFace `.bin` model from disk.
        ///
        /// # Arguments
        ///
        /// * `path` - The path to the model file.
        /// * `settings` - Detection parameters applied on every call.
        pub fn from_path<P: AsRef<Path>>(path: P, settings: &DetectionSettings) -> Result<Self> {
            let path = path.as_ref();
            let _guard = timing_guard("undertone_core::load_model", log::Level::Debug);
            let file = File::open(path)
                .with_context(|| format!("failed to open model {}", path.display()))?;
            let model = rustface::read_model(BufReader::new(file))
                .with_context(|| format!("failed to parse model {}", path.display()))?;
            debug!("Loaded SeetaFace model from {}", path.display());
            if settings.has_custom_min_neighbors() {
                debug!(
                    "min_neighbors = {} is ignored by the SeetaFace backend",
                    settings.min_neighbors
                );
            }
            Ok(Self {
                model,
                settings: settings.clone(),
            })
        }
    }

    impl FaceDetector for SeetaFaceDetector {
        fn detect(&self, gray: &GrayImage) -> Vec<BoundingBox> {
            let (width, height) = gray.dimensions();
            // The engine cannot build an image pyramid smaller than its window.
            if width < self.settings.min_face_size || height < self.settings.min_face_size {
                debug!(
                    "Image {width}x{height} is smaller than min face size {}",
                    self.settings.min_face_size
                );
                return Vec::new();
            }

            let mut detector = rustface::create_detector_with_model(self.model.clone());
            detector.set_min_face_size(self.settings.min_face_size);
            detector.set_score_thresh(self.settings.score_threshold);
            detector.set_pyramid_scale_factor(self.settings.pyramid_scale());
            detector.set_slide_window_step(
                self.settings.slide_window_step,
                self.settings.slide_window_step,
            );

            let faces = detector.detect(&rustface::ImageData::new(gray.as_raw(), width, height));
            faces
                .iter()
                .map(|face| {
                    let bbox = face.bbox();
                    BoundingBox::new(bbox.x(), bbox.y(), bbox.width(), bbox.height())
                })
                .collect()
        }
    }
}
