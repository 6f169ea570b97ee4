use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Pixel dimensions of a decoded video frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FrameSize {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
}

impl FrameSize {
    /// Create a new frame size.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// A normalized rectangle (0.0 to 1.0) representing a relative region of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NormalizedRect {
    /// X coordinate of the top-left corner (0.0 = left, 1.0 = right)
    pub x: f64,
    /// Y coordinate of the top-left corner (0.0 = top, 1.0 = bottom)
    pub y: f64,
    /// Width of the rectangle (0.0 to 1.0)
    pub width: f64,
    /// Height of the rectangle (0.0 to 1.0)
    pub height: f64,
}

impl NormalizedRect {
    /// Create a new normalized rectangle.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Normalize a pixel-space box given as top-left/bottom-right corners.
    pub fn from_corner_pixels(frame: FrameSize, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        let fw = frame.width as f64;
        let fh = frame.height as f64;
        Self {
            x: x1 as f64 / fw,
            y: y1 as f64 / fh,
            width: (x2 - x1) as f64 / fw,
            height: (y2 - y1) as f64 / fh,
        }
    }

    /// Normalize a pixel-space box given as a center point plus dimensions.
    pub fn from_center_pixels(frame: FrameSize, cx: f32, cy: f32, w: f32, h: f32) -> Self {
        let fw = frame.width as f64;
        let fh = frame.height as f64;
        Self {
            x: (cx - w / 2.0) as f64 / fw,
            y: (cy - h / 2.0) as f64 / fh,
            width: w as f64 / fw,
            height: h as f64 / fh,
        }
    }

    /// Check if the rectangle is valid (within 0.0-1.0 range).
    pub fn is_valid(&self) -> bool {
        self.x >= 0.0
            && self.y >= 0.0
            && self.width > 0.0
            && self.height > 0.0
            && self.x + self.width <= 1.001 // Allow small epsilon for float precision
            && self.y + self.height <= 1.001
    }
}
