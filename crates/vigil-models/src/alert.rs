//! Alert decision produced per frame.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::detection::Detection;
use crate::rect::NormalizedRect;

/// The per-frame alert decision: whether a suspicious object was seen, which
/// one won, and the full unified detection list.
///
/// Constructed fresh per request and never persisted. The optional fields are
/// present only when `detected` is true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AlertDecision {
    pub detected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<NormalizedRect>,
    pub all_detections: Vec<Detection>,
}

impl AlertDecision {
    /// A positive decision carrying the winning suspicious detection.
    pub fn alert(
        object_type: impl Into<String>,
        confidence: f64,
        bounding_box: NormalizedRect,
        all_detections: Vec<Detection>,
    ) -> Self {
        Self {
            detected: true,
            object_type: Some(object_type.into()),
            confidence: Some(confidence),
            bounding_box: Some(bounding_box),
            all_detections,
        }
    }

    /// A negative decision carrying only the unified detection list.
    pub fn clear(all_detections: Vec<Detection>) -> Self {
        Self {
            detected: false,
            object_type: None,
            confidence: None,
            bounding_box: None,
            all_detections,
        }
    }
}
