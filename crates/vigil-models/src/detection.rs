//! Detection value types.
//!
//! `Detection` is the unified wire form sent to the front-end. The two raw
//! forms mirror what each backend natively reports: the general model emits
//! pixel-space corner boxes, the specialist service emits center-based boxes
//! with percentage confidences.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::rect::NormalizedRect;

/// One labeled bounding box with a confidence score, in normalized coordinates.
///
/// Immutable once produced; field names match what the front-end overlay
/// renderer expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Detection {
    /// Object class label
    #[serde(rename = "type")]
    pub label: String,
    /// Detection confidence in [0, 1]
    pub confidence: f64,
    /// Bounding box, normalized to frame dimensions
    #[serde(rename = "boundingBox")]
    pub bounding_box: NormalizedRect,
}

impl Detection {
    /// Create a new detection.
    pub fn new(label: impl Into<String>, confidence: f64, bounding_box: NormalizedRect) -> Self {
        Self {
            label: label.into(),
            confidence,
            bounding_box,
        }
    }
}

/// Raw output of the general backend: corner-form pixel box, confidence in [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct CornerDetection {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    /// Confidence in [0, 1]
    pub confidence: f32,
    /// Class label resolved from the model's class table
    pub label: String,
}

/// Raw output of the specialist backend: center-form pixel box, confidence in [0, 100].
#[derive(Debug, Clone, PartialEq)]
pub struct CenterDetection {
    /// Box center X in pixels
    pub x: f32,
    /// Box center Y in pixels
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Confidence as a percentage in [0, 100]
    pub confidence: f32,
    pub label: String,
}
