use serde::{Deserialize, Serialize};

/// Axis-aligned face box in photo pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BoundingBox {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Builds a box from floating-point corners, clamped to the photo bounds.
    pub fn from_corners(
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        photo_width: u32,
        photo_height: u32,
    ) -> Self {
        let max_x = photo_width as f64;
        let max_y = photo_height as f64;
        let left = x1.clamp(0.0, max_x).round() as i32;
        let top = y1.clamp(0.0, max_y).round() as i32;
        let right = x2.clamp(0.0, max_x).round() as i32;
        let bottom = y2.clamp(0.0, max_y).round() as i32;
        Self {
            x: left,
            y: top,
            width: (right - left).max(0),
            height: (bottom - top).max(0),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}
