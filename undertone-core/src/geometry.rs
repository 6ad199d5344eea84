//! Bounding-box padding and clamping.
//!
//! Detected faces are widened by a fixed fraction of their size on every side
//! before cropping, so the analyzer sees some forehead, chin and cheek. The
//! padded rectangle is clamped to the source image and expressed as half-open
//! pixel ranges.

use serde::{Deserialize, Serialize};

/// Fraction of the box width/height added on each side.
pub const FACE_PADDING: f64 = 0.2;

/// Axis-aligned face box reported by a detector, in source pixel coordinates.
///
/// `x`/`y` are signed because detectors may report boxes that start just
/// outside the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    /// The x-coordinate of the top-left corner.
    pub x: i32,
    /// The y-coordinate of the top-left corner.
    pub y: i32,
    /// The width of the box.
    pub width: u32,
    /// The height of the box.
    pub height: u32,
}

impl BoundingBox {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// Padded crop rectangle, `[start_x, end_x) x [start_y, end_y)`.
///
/// Always satisfies `start_x <= end_x <= image_width` and
/// `start_y <= end_y <= image_height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaddedRegion {
    pub start_x: u32,
    pub start_y: u32,
    pub end_x: u32,
    pub end_y: u32,
}

impl PaddedRegion {
    pub fn width(&self) -> u32 {
        self.end_x - self.start_x
    }

    pub fn height(&self) -> u32 {
        self.end_y - self.start_y
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width()) * u64::from(self.height())
    }

    /// A region with no pixels; there is nothing to crop.
    pub fn is_degenerate(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

/// Expand `bbox` by [`FACE_PADDING`] per side and clamp it to the image.
///
/// Padding is `floor(0.2 * size)` per axis. A zero-sized box, or one that lies
/// completely outside the image, produces a degenerate region.
///
/// ```rust
/// # use undertone_core::geometry::{pad_and_clamp, BoundingBox, PaddedRegion};
/// let region = pad_and_clamp(BoundingBox::new(10, 10, 100, 100), 120, 120);
/// assert_eq!(
///     region,
///     PaddedRegion { start_x: 0, start_y: 0, end_x: 120, end_y: 120 }
/// );
/// ```
pub fn pad_and_clamp(bbox: BoundingBox, image_width: u32, image_height: u32) -> PaddedRegion {
    let (start_x, end_x) = pad_axis(bbox.x, bbox.width, image_width);
    let (start_y, end_y) = pad_axis(bbox.y, bbox.height, image_height);
    PaddedRegion {
        start_x,
        start_y,
        end_x,
        end_y,
    }
}

fn pad_axis(origin: i32, size: u32, limit: u32) -> (u32, u32) {
    let padding = (f64::from(size) * FACE_PADDING).floor() as i64;
    let origin = i64::from(origin);
    let limit = i64::from(limit);

    let end = (origin + i64::from(size) + padding).clamp(0, limit);
    let start = (origin - padding).clamp(0, end);
    // Both values are within [0, limit] and limit fits in u32.
    (start as u32, end as u32)
}
