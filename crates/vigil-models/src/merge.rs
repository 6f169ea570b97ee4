//! Detection merging and alert selection.
//!
//! Pure, single-pass transform: both backends' raw outputs are normalized into
//! a unified list, and the highest-confidence suspicious detection (if any)
//! becomes the alert winner. General-backend detections are processed first,
//! in detector order, then the specialist's; the running maximum uses strict
//! `>`, so an equal-confidence detection never displaces an earlier one.

use crate::alert::AlertDecision;
use crate::detection::{CenterDetection, CornerDetection, Detection};
use crate::rect::{FrameSize, NormalizedRect};
use crate::suspicious::SuspiciousSet;

/// Running best suspicious detection.
struct Best {
    label: String,
    confidence: f64,
    bounding_box: NormalizedRect,
}

/// Merge both backends' raw detections into a unified normalized list and
/// decide whether to alert.
///
/// The specialist list is expected to already reflect the failure policy: a
/// failed specialist call contributes an empty slice, which is
/// indistinguishable from the service returning no predictions.
pub fn merge_detections(
    frame: FrameSize,
    general: &[CornerDetection],
    specialist: &[CenterDetection],
    suspicious: &SuspiciousSet,
) -> AlertDecision {
    let mut unified = Vec::with_capacity(general.len() + specialist.len());
    let mut best: Option<Best> = None;

    for det in general {
        let rect = NormalizedRect::from_corner_pixels(frame, det.x1, det.y1, det.x2, det.y2);
        let confidence = det.confidence as f64;
        consider(&mut best, suspicious, &det.label, confidence, rect);
        unified.push(Detection::new(det.label.clone(), confidence, rect));
    }

    for det in specialist {
        let rect =
            NormalizedRect::from_center_pixels(frame, det.x, det.y, det.width, det.height);
        // Specialist confidences arrive as percentages
        let confidence = det.confidence as f64 / 100.0;
        consider(&mut best, suspicious, &det.label, confidence, rect);
        unified.push(Detection::new(det.label.clone(), confidence, rect));
    }

    match best {
        Some(b) => AlertDecision::alert(b.label, b.confidence, b.bounding_box, unified),
        None => AlertDecision::clear(unified),
    }
}

fn consider(
    best: &mut Option<Best>,
    suspicious: &SuspiciousSet,
    label: &str,
    confidence: f64,
    bounding_box: NormalizedRect,
) {
    if !suspicious.contains(label) {
        return;
    }
    let current = best.as_ref().map(|b| b.confidence).unwrap_or(0.0);
    if confidence > current {
        *best = Some(Best {
            label: label.to_string(),
            confidence,
            bounding_box,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> FrameSize {
        FrameSize::new(100, 100)
    }

    fn corner(label: &str, confidence: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> CornerDetection {
        CornerDetection {
            x1,
            y1,
            x2,
            y2,
            confidence,
            label: label.to_string(),
        }
    }

    fn center(label: &str, confidence: f32, x: f32, y: f32, w: f32, h: f32) -> CenterDetection {
        CenterDetection {
            x,
            y,
            width: w,
            height: h,
            confidence,
            label: label.to_string(),
        }
    }

    #[test]
    fn knife_from_general_backend_alerts() {
        let general = vec![corner("knife", 0.7, 10.0, 10.0, 50.0, 50.0)];
        let decision = merge_detections(frame(), &general, &[], &SuspiciousSet::default());

        assert!(decision.detected);
        assert_eq!(decision.object_type.as_deref(), Some("knife"));
        assert!((decision.confidence.unwrap() - 0.7).abs() < 1e-6);
        let bbox = decision.bounding_box.unwrap();
        assert!((bbox.x - 0.1).abs() < 1e-6);
        assert!((bbox.y - 0.1).abs() < 1e-6);
        assert!((bbox.width - 0.4).abs() < 1e-6);
        assert!((bbox.height - 0.4).abs() < 1e-6);
        assert_eq!(decision.all_detections.len(), 1);
    }

    #[test]
    fn non_suspicious_labels_never_alert() {
        let general = vec![
            corner("person", 0.99, 0.0, 0.0, 50.0, 100.0),
            corner("chair", 0.8, 50.0, 50.0, 90.0, 90.0),
        ];
        let specialist = vec![center("dog", 95.0, 50.0, 50.0, 20.0, 20.0)];
        let decision =
            merge_detections(frame(), &general, &specialist, &SuspiciousSet::default());

        assert!(!decision.detected);
        assert!(decision.object_type.is_none());
        assert!(decision.confidence.is_none());
        assert!(decision.bounding_box.is_none());
        assert_eq!(decision.all_detections.len(), 3);
    }

    #[test]
    fn highest_confidence_suspicious_wins_across_backends() {
        let general = vec![corner("knife", 0.6, 10.0, 10.0, 20.0, 20.0)];
        let specialist = vec![center("scissors", 90.0, 50.0, 50.0, 10.0, 10.0)];
        let decision =
            merge_detections(frame(), &general, &specialist, &SuspiciousSet::default());

        assert!(decision.detected);
        assert_eq!(decision.object_type.as_deref(), Some("scissors"));
        assert!((decision.confidence.unwrap() - 0.9).abs() < 1e-6);
    }

    #[test]
    fn equal_confidence_keeps_earlier_detection() {
        // Both 0.5; the general backend is processed first and must win.
        let general = vec![corner("knife", 0.5, 10.0, 10.0, 20.0, 20.0)];
        let specialist = vec![center("scissors", 50.0, 50.0, 50.0, 10.0, 10.0)];
        let decision =
            merge_detections(frame(), &general, &specialist, &SuspiciousSet::default());

        assert_eq!(decision.object_type.as_deref(), Some("knife"));

        // Same rule within a single backend's list.
        let general = vec![
            corner("knife", 0.5, 10.0, 10.0, 20.0, 20.0),
            corner("scissors", 0.5, 30.0, 30.0, 40.0, 40.0),
        ];
        let decision = merge_detections(frame(), &general, &[], &SuspiciousSet::default());
        assert_eq!(decision.object_type.as_deref(), Some("knife"));
    }

    #[test]
    fn specialist_confidence_is_rescaled_from_percentage() {
        let specialist = vec![center("knife", 72.0, 50.0, 50.0, 20.0, 20.0)];
        let decision =
            merge_detections(frame(), &[], &specialist, &SuspiciousSet::default());

        assert!((decision.confidence.unwrap() - 0.72).abs() < 1e-6);
        assert!((decision.all_detections[0].confidence - 0.72).abs() < 1e-6);
    }

    #[test]
    fn suspicious_match_is_case_insensitive() {
        let general = vec![corner("Knife", 0.7, 10.0, 10.0, 50.0, 50.0)];
        let decision = merge_detections(frame(), &general, &[], &SuspiciousSet::default());

        assert!(decision.detected);
        // Winner carries the label as reported by the backend
        assert_eq!(decision.object_type.as_deref(), Some("Knife"));
    }

    #[test]
    fn all_normalized_boxes_within_unit_range() {
        let general = vec![
            corner("person", 0.9, 0.0, 0.0, 100.0, 100.0),
            corner("knife", 0.4, 80.0, 80.0, 100.0, 100.0),
        ];
        let specialist = vec![center("scissors", 55.0, 50.0, 50.0, 100.0, 100.0)];
        let decision =
            merge_detections(frame(), &general, &specialist, &SuspiciousSet::default());

        for det in &decision.all_detections {
            assert!(det.bounding_box.is_valid(), "invalid box: {:?}", det);
            assert!(det.confidence >= 0.0 && det.confidence <= 1.0);
        }
    }

    #[test]
    fn unified_list_preserves_source_order() {
        let general = vec![
            corner("person", 0.9, 0.0, 0.0, 10.0, 10.0),
            corner("chair", 0.8, 10.0, 10.0, 20.0, 20.0),
        ];
        let specialist = vec![center("knife", 60.0, 50.0, 50.0, 10.0, 10.0)];
        let decision =
            merge_detections(frame(), &general, &specialist, &SuspiciousSet::default());

        let labels: Vec<&str> = decision
            .all_detections
            .iter()
            .map(|d| d.label.as_str())
            .collect();
        assert_eq!(labels, vec!["person", "chair", "knife"]);
    }

    #[test]
    fn zero_confidence_suspicious_never_alerts() {
        // Running maximum starts at 0; strict `>` means a 0-confidence
        // detection cannot win.
        let general = vec![corner("knife", 0.0, 10.0, 10.0, 20.0, 20.0)];
        let decision = merge_detections(frame(), &general, &[], &SuspiciousSet::default());
        assert!(!decision.detected);
        assert_eq!(decision.all_detections.len(), 1);
    }
}
