//! Shared data models for the Vigil backend.
//!
//! This crate provides Serde-serializable types for:
//! - Detections and normalized bounding boxes
//! - The suspicious-class set that gates alerting
//! - Alert decisions returned to the surveillance front-end
//!
//! It also hosts the detection-merge core: a pure, single-pass transform that
//! unifies the outputs of both detection backends and picks the alert winner.

pub mod alert;
pub mod detection;
pub mod merge;
pub mod rect;
pub mod suspicious;

// Re-export common types
pub use alert::AlertDecision;
pub use detection::{CenterDetection, CornerDetection, Detection};
pub use merge::merge_detections;
pub use rect::{FrameSize, NormalizedRect};
pub use suspicious::{SuspiciousSet, DEFAULT_SUSPICIOUS_CLASSES};
