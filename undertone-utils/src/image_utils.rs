use std::path::Path;

use anyhow::{Context, Result};
use image::{DynamicImage, GrayImage};

/// Load an image from disk into memory.
///
/// # Arguments
///
/// * `path` - The path to the image file.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<DynamicImage> {
    let path_ref = path.as_ref();
    image::open(path_ref).with_context(|| format!("failed to open image {}", path_ref.display()))
}

/// Luma-only copy of `image`, the input face detectors work on.
pub fn to_grayscale(image: &DynamicImage) -> GrayImage {
    image::imageops::grayscale(image)
}

/// Copy the half-open rectangle `[start_x, end_x) x [start_y, end_y)` into a new owned image.
///
/// Returns `None` when the rectangle is empty or does not fit inside `image`.
pub fn crop_rect(
    image: &DynamicImage,
    start_x: u32,
    start_y: u32,
    end_x: u32,
    end_y: u32,
) -> Option<DynamicImage> {
    if end_x <= start_x || end_y <= start_y {
        return None;
    }
    if end_x > image.width() || end_y > image.height() {
        return None;
    }
    Some(image.crop_imm(start_x, start_y, end_x - start_x, end_y - start_y))
}
