//! Saves annotated detections and face crops for visual inspection.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use image::{DynamicImage, Rgba};
use imageproc::{drawing::draw_hollow_rect_mut, rect::Rect};
use log::info;
use undertone_core::{BoundingBox, FaceObserver, PaddedRegion};

/// Writes `<stem>_faces.png` with every detection outlined and
/// `<stem>_face_<id>.png` for each padded crop.
pub struct AnnotationObserver {
    output_dir: PathBuf,
    stem: String,
}

impl AnnotationObserver {
    pub fn new(output_dir: &Path, image_path: &Path) -> Result<Self> {
        fs::create_dir_all(output_dir).with_context(|| {
            format!(
                "failed to create annotation directory {}",
                output_dir.display()
            )
        })?;
        let stem = image_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            stem,
        })
    }

    fn save(&self, image: &DynamicImage, name: &str) -> Result<PathBuf> {
        let path = self.output_dir.join(name);
        image
            .save(&path)
            .with_context(|| format!("failed to save annotated image {}", path.display()))?;
        info!("Annotated image saved to {}", path.display());
        Ok(path)
    }
}

impl FaceObserver for AnnotationObserver {
    fn on_detections(&self, image: &DynamicImage, boxes: &[BoundingBox]) -> Result<()> {
        let mut canvas = image.to_rgba8();
        let (img_w, img_h) = canvas.dimensions();
        anyhow::ensure!(
            img_w > 0 && img_h > 0,
            "cannot annotate image with zero dimensions"
        );

        let rect_color = Rgba([255, 0, 0, 255]);
        for bbox in boxes {
            if let Some(rect) = rect_from_bbox(bbox, img_w, img_h) {
                draw_hollow_rect_mut(&mut canvas, rect, rect_color);
            }
        }
        self.save(
            &DynamicImage::ImageRgba8(canvas),
            &format!("{}_faces.png", self.stem),
        )?;
        Ok(())
    }

    fn on_face(
        &self,
        face_id: usize,
        _bbox: &BoundingBox,
        _region: &PaddedRegion,
        crop: &DynamicImage,
    ) -> Result<()> {
        self.save(crop, &format!("{}_face_{face_id}.png", self.stem))?;
        Ok(())
    }
}

/// Clip a detector box to the image; `None` when nothing of it is visible.
fn rect_from_bbox(bbox: &BoundingBox, img_w: u32, img_h: u32) -> Option<Rect> {
    let x1 = i64::from(bbox.x).clamp(0, i64::from(img_w));
    let y1 = i64::from(bbox.y).clamp(0, i64::from(img_h));
    let x2 = (i64::from(bbox.x) + i64::from(bbox.width)).clamp(0, i64::from(img_w));
    let y2 = (i64::from(bbox.y) + i64::from(bbox.height)).clamp(0, i64::from(img_h));
    if x2 <= x1 || y2 <= y1 {
        return None;
    }
    Some(Rect::at(x1 as i32, y1 as i32).of_size((x2 - x1) as u32, (y2 - y1) as u32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn rect_is_clipped_to_image() {
        let rect = rect_from_bbox(&BoundingBox::new(-10, 5, 50, 20), 30, 30).unwrap();
        assert_eq!((rect.left(), rect.top()), (0, 5));
        assert_eq!((rect.width(), rect.height()), (30, 20));
        assert!(rect_from_bbox(&BoundingBox::new(40, 40, 5, 5), 30, 30).is_none());
    }

    #[test]
    fn writes_overview_and_crops() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("annotated");
        let observer = AnnotationObserver::new(&out, Path::new("/photos/portrait.jpg")).unwrap();

        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(40, 40, Rgb([200, 150, 120])));
        let bbox = BoundingBox::new(10, 10, 20, 20);
        observer.on_detections(&image, &[bbox]).unwrap();
        let region = undertone_core::pad_and_clamp(bbox, 40, 40);
        observer
            .on_face(1, &bbox, &region, &image.crop_imm(6, 6, 28, 28))
            .unwrap();

        let overview = image::open(out.join("portrait_faces.png")).unwrap().to_rgba8();
        assert_eq!(overview.get_pixel(10, 10).0, [255, 0, 0, 255]);
        assert_eq!(overview.get_pixel(20, 20).0, [200, 150, 120, 255]);
        let crop = image::open(out.join("portrait_face_1.png")).unwrap();
        assert_eq!((crop.width(), crop.height()), (28, 28));
    }
}
