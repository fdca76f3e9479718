use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in page pixel space.
///
/// Covers `x..x + width` horizontally and `y..y + height` vertically
/// (half-open). Degenerate rectangles (zero or negative extent) are allowed
/// and are used to carry horizontal bounds only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl PixelRect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle spanning `left..right` with no vertical extent.
    pub const fn horizontal_band(left: i32, right: i32) -> Self {
        Self::new(left, 0, right - left, 0)
    }

    /// Rectangle centered on `(cx, cy)` with the given half extents.
    pub const fn from_center(cx: i32, cy: i32, half_w: i32, half_h: i32) -> Self {
        Self::new(cx - half_w, cy - half_h, 2 * half_w, 2 * half_h)
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Geometric center, in sub-pixel precision.
    pub fn center(&self) -> Point2<f32> {
        Point2::new(
            self.x as f32 + 0.5 * self.width as f32,
            self.y as f32 + 0.5 * self.height as f32,
        )
    }

    /// Inflate by `dx` on the left and right, `dy` on the top and bottom.
    ///
    /// Negative amounts shrink the rectangle.
    pub fn grow(&self, dx: i32, dy: i32) -> Self {
        Self::new(
            self.x - dx,
            self.y - dy,
            self.width + 2 * dx,
            self.height + 2 * dy,
        )
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &PixelRect) -> Self {
        let x0 = self.x.min(other.x);
        let y0 = self.y.min(other.y);
        let x1 = self.right().max(other.right());
        let y1 = self.bottom().max(other.bottom());
        Self::new(x0, y0, x1 - x0, y1 - y0)
    }

    /// Whether the two rectangles share at least one pixel.
    pub fn intersects(&self, other: &PixelRect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Euclidean distance between the two centers.
    pub fn center_distance(&self, other: &PixelRect) -> f32 {
        nalgebra::distance(&self.center(), &other.center())
    }
}
