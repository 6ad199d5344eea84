use anyhow::Result;
use image::DynamicImage;

use crate::geometry::{BoundingBox, PaddedRegion};

/// Side-channel notified while a run progresses.
///
/// Observers see the detections and each face crop but cannot influence the
/// result; an `Err` is logged by the pipeline and otherwise ignored.
pub trait FaceObserver: Send + Sync {
    /// Called once after detection with every box, in detector order.
    fn on_detections(&self, _image: &DynamicImage, _boxes: &[BoundingBox]) -> Result<()> {
        Ok(())
    }

    /// Called for each non-degenerate face before it is analyzed.
    fn on_face(
        &self,
        _face_id: usize,
        _bbox: &BoundingBox,
        _region: &PaddedRegion,
        _crop: &DynamicImage,
    ) -> Result<()> {
        Ok(())
    }
}

/// Observer that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl FaceObserver for NoopObserver {}
