//! Local object detection for the Vigil backend.
//!
//! Wraps a pretrained multi-class COCO model (YOLOv8, ONNX format) behind a
//! small API: load the model once at startup, then run per-frame inference
//! returning pixel-space corner boxes with class labels. Coordinate
//! normalization is owned by the merge core in `vigil-models`.

pub mod error;
pub mod yolo;

pub use error::{DetectError, DetectResult};
pub use yolo::{YoloConfig, YoloDetector, COCO_CLASSES};
