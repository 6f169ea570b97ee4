//! Object detection using a YOLOv8 ONNX model.
//!
//! Provides the general multi-class backend with GPU acceleration support:
//! - CUDA on Linux with NVIDIA GPU
//! - CoreML on macOS with Apple Silicon
//! - CPU fallback on all platforms

use std::path::Path;
use std::sync::Mutex;

use image::{DynamicImage, GenericImageView};
use ndarray::Array;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::{Tensor, Value};
use tracing::{debug, info};

use vigil_models::CornerDetection;

use crate::error::{DetectError, DetectResult};

/// COCO class names (80 classes).
pub const COCO_CLASSES: &[&str] = &[
    "person", "bicycle", "car", "motorcycle", "airplane", "bus", "train", "truck",
    "boat", "traffic light", "fire hydrant", "stop sign", "parking meter", "bench",
    "bird", "cat", "dog", "horse", "sheep", "cow", "elephant", "bear", "zebra",
    "giraffe", "backpack", "umbrella", "handbag", "tie", "suitcase", "frisbee",
    "skis", "snowboard", "sports ball", "kite", "baseball bat", "baseball glove",
    "skateboard", "surfboard", "tennis racket", "bottle", "wine glass", "cup",
    "fork", "knife", "spoon", "bowl", "banana", "apple", "sandwich", "orange",
    "broccoli", "carrot", "hot dog", "pizza", "donut", "cake", "chair", "couch",
    "potted plant", "bed", "dining table", "toilet", "tv", "laptop", "mouse",
    "remote", "keyboard", "cell phone", "microwave", "oven", "toaster", "sink",
    "refrigerator", "book", "clock", "vase", "scissors", "teddy bear", "hair drier",
    "toothbrush",
];

/// Configuration for the local detector.
#[derive(Debug, Clone)]
pub struct YoloConfig {
    /// Path to ONNX model file
    pub model_path: String,
    /// Confidence threshold for detections
    pub confidence_threshold: f32,
    /// IoU threshold for NMS
    pub nms_threshold: f32,
    /// Input image size (model expects square input)
    pub input_size: u32,
}

impl Default for YoloConfig {
    fn default() -> Self {
        Self {
            model_path: "models/yolov8n.onnx".to_string(),
            confidence_threshold: 0.25,
            nms_threshold: 0.45,
            input_size: 640,
        }
    }
}

impl YoloConfig {
    /// Check whether the configured model file exists on disk.
    pub fn model_available(&self) -> bool {
        Path::new(&self.model_path).exists()
    }
}

/// General object detector backed by a YOLOv8 ONNX session.
///
/// The session is created once and shared by all requests; `ort` sessions are
/// not `Sync`, so inference serializes on an internal mutex.
pub struct YoloDetector {
    session: Mutex<Session>,
    config: YoloConfig,
}

impl YoloDetector {
    /// Load the model and build a detector.
    ///
    /// Returns an error if the model file doesn't exist or cannot be loaded.
    pub fn new(config: YoloConfig) -> DetectResult<Self> {
        if !config.model_available() {
            return Err(DetectError::model_not_found(&config.model_path));
        }

        let session = Mutex::new(create_session(Path::new(&config.model_path))?);
        info!(
            model_path = %config.model_path,
            input_size = config.input_size,
            "Local detector initialized"
        );

        Ok(Self { session, config })
    }

    /// Detect objects in a decoded frame.
    ///
    /// Returns pixel-space corner boxes with COCO labels, in the order the
    /// model reports them after NMS.
    pub fn detect(&self, img: &DynamicImage) -> DetectResult<Vec<CornerDetection>> {
        let (width, height) = img.dimensions();
        let input = self.preprocess(img)?;
        let raw = self.run_inference(input)?;
        let candidates = self.postprocess(&raw, width, height)?;
        let detections =
            non_maximum_suppression(candidates, self.config.nms_threshold);

        debug!(count = detections.len(), "Local detection completed");
        Ok(detections)
    }

    /// Get the configuration.
    pub fn config(&self) -> &YoloConfig {
        &self.config
    }

    /// Resize, normalize to [0,1], and lay out as NCHW for the model.
    fn preprocess(&self, img: &DynamicImage) -> DetectResult<Value> {
        let size = self.config.input_size;
        let rgb = img
            .resize_exact(size, size, image::imageops::FilterType::Triangle)
            .to_rgb8();

        let plane = (size * size) as usize;
        let mut chw = vec![0f32; 3 * plane];
        for (i, pixel) in rgb.pixels().enumerate() {
            chw[i] = pixel[0] as f32 / 255.0;
            chw[plane + i] = pixel[1] as f32 / 255.0;
            chw[2 * plane + i] = pixel[2] as f32 / 255.0;
        }

        let shape = vec![1usize, 3, size as usize, size as usize];
        Tensor::from_array((shape, chw.into_boxed_slice()))
            .map(Value::from)
            .map_err(|e| DetectError::internal(format!("Failed to create tensor: {}", e)))
    }

    fn run_inference(&self, input: Value) -> DetectResult<Vec<f32>> {
        let mut session = self
            .session
            .lock()
            .map_err(|_| DetectError::internal("Session lock poisoned"))?;

        let outputs = session
            .run(ort::inputs![input])
            .map_err(|e| DetectError::inference(format!("ONNX inference failed: {}", e)))?;

        let output = outputs
            .get("output0")
            .ok_or_else(|| DetectError::inference("Missing output0 tensor"))?;

        let tensor = output
            .try_extract_tensor::<f32>()
            .map_err(|e| DetectError::inference(format!("Failed to extract tensor: {}", e)))?;

        Ok(tensor.1.iter().copied().collect())
    }

    /// Parse the raw YOLOv8 output into pixel-space corner boxes.
    ///
    /// Output layout is [1, 84, 8400]: 4 bbox values (cx, cy, w, h in model
    /// coordinates) plus 80 class scores, for 8400 candidates.
    fn postprocess(
        &self,
        raw: &[f32],
        frame_width: u32,
        frame_height: u32,
    ) -> DetectResult<Vec<CornerDetection>> {
        const NUM_CLASSES: usize = 80;
        const NUM_BOXES: usize = 8400;
        const NUM_FEATURES: usize = 84;

        if raw.len() != NUM_FEATURES * NUM_BOXES {
            return Err(DetectError::inference(format!(
                "Unexpected output size: expected {}, got {}",
                NUM_FEATURES * NUM_BOXES,
                raw.len()
            )));
        }

        // Output is [84, 8400]; transpose so each row is one candidate.
        let grid = Array::from_shape_vec((NUM_FEATURES, NUM_BOXES), raw.to_vec())
            .map_err(|e| DetectError::inference(format!("Failed to reshape output: {}", e)))?;
        let grid = grid.t();

        let input_size = self.config.input_size as f32;
        let scale_w = frame_width as f32 / input_size;
        let scale_h = frame_height as f32 / input_size;
        let fw = frame_width as f32;
        let fh = frame_height as f32;

        let mut candidates = Vec::new();
        for i in 0..NUM_BOXES {
            let mut best_class = 0;
            let mut best_score = 0.0f32;
            for c in 0..NUM_CLASSES {
                let score = grid[[i, 4 + c]];
                if score > best_score {
                    best_score = score;
                    best_class = c;
                }
            }

            if best_score < self.config.confidence_threshold {
                continue;
            }

            // Center form in model coordinates -> corner form in frame pixels,
            // clamped to frame bounds so downstream normalization stays in [0,1].
            let cx = grid[[i, 0]];
            let cy = grid[[i, 1]];
            let w = grid[[i, 2]];
            let h = grid[[i, 3]];

            let x1 = ((cx - w / 2.0) * scale_w).clamp(0.0, fw);
            let y1 = ((cy - h / 2.0) * scale_h).clamp(0.0, fh);
            let x2 = ((cx + w / 2.0) * scale_w).clamp(0.0, fw);
            let y2 = ((cy + h / 2.0) * scale_h).clamp(0.0, fh);

            candidates.push(CornerDetection {
                x1,
                y1,
                x2,
                y2,
                confidence: best_score,
                label: COCO_CLASSES[best_class].to_string(),
            });
        }

        Ok(candidates)
    }
}

/// Remove overlapping same-class detections, keeping the most confident.
pub fn non_maximum_suppression(
    mut detections: Vec<CornerDetection>,
    iou_threshold: f32,
) -> Vec<CornerDetection> {
    detections.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut keep: Vec<CornerDetection> = Vec::with_capacity(detections.len());
    for det in detections {
        let overlaps = keep
            .iter()
            .any(|k| k.label == det.label && iou(k, &det) > iou_threshold);
        if !overlaps {
            keep.push(det);
        }
    }
    keep
}

/// Intersection over Union for corner-form boxes.
fn iou(a: &CornerDetection, b: &CornerDetection) -> f32 {
    let ix1 = a.x1.max(b.x1);
    let iy1 = a.y1.max(b.y1);
    let ix2 = a.x2.min(b.x2);
    let iy2 = a.y2.min(b.y2);

    let intersection = (ix2 - ix1).max(0.0) * (iy2 - iy1).max(0.0);
    let area_a = (a.x2 - a.x1) * (a.y2 - a.y1);
    let area_b = (b.x2 - b.x1) * (b.y2 - b.y1);
    let union = area_a + area_b - intersection;

    if union > 0.0 {
        intersection / union
    } else {
        0.0
    }
}

/// Create the ONNX Runtime session with automatic execution provider selection.
fn create_session(model_path: &Path) -> DetectResult<Session> {
    let model_bytes = std::fs::read(model_path)?;

    let mut builder = Session::builder()
        .map_err(|e| DetectError::internal(format!("Failed to create session builder: {}", e)))?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .map_err(|e| DetectError::internal(format!("Failed to set optimization level: {}", e)))?;

    // Try CUDA on Linux with cuda feature
    #[cfg(all(target_os = "linux", feature = "cuda"))]
    {
        use ort::execution_providers::CUDAExecutionProvider;
        if let Ok(cuda_builder) = builder
            .clone()
            .with_execution_providers([CUDAExecutionProvider::default().build()])
        {
            if let Ok(session) = cuda_builder.commit_from_memory(&model_bytes) {
                info!("Using CUDA execution provider for detection");
                return Ok(session);
            }
        }
        debug!("CUDA execution provider not available, trying alternatives");
    }

    // Try CoreML on macOS
    #[cfg(target_os = "macos")]
    {
        use ort::execution_providers::CoreMLExecutionProvider;
        if let Ok(coreml_builder) = builder
            .clone()
            .with_execution_providers([CoreMLExecutionProvider::default().build()])
        {
            if let Ok(session) = coreml_builder.commit_from_memory(&model_bytes) {
                info!("Using CoreML execution provider for detection");
                return Ok(session);
            }
        }
        debug!("CoreML execution provider not available, using CPU");
    }

    // CPU fallback
    info!("Using CPU execution provider for detection");
    builder
        .commit_from_memory(&model_bytes)
        .map_err(|e| DetectError::internal(format!("Failed to load ONNX model: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn det(label: &str, confidence: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> CornerDetection {
        CornerDetection {
            x1,
            y1,
            x2,
            y2,
            confidence,
            label: label.to_string(),
        }
    }

    #[test]
    fn coco_table_shape() {
        assert_eq!(COCO_CLASSES.len(), 80);
        assert_eq!(COCO_CLASSES[0], "person");
        assert_eq!(COCO_CLASSES[43], "knife");
        assert_eq!(COCO_CLASSES[76], "scissors");
    }

    #[test]
    fn config_defaults() {
        let config = YoloConfig::default();
        assert_eq!(config.input_size, 640);
        assert!((config.confidence_threshold - 0.25).abs() < 1e-6);
        assert!((config.nms_threshold - 0.45).abs() < 1e-6);
    }

    #[test]
    fn iou_of_identical_boxes_is_one() {
        let a = det("knife", 0.9, 10.0, 10.0, 50.0, 50.0);
        assert!((iou(&a, &a) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn iou_of_disjoint_boxes_is_zero() {
        let a = det("knife", 0.9, 0.0, 0.0, 10.0, 10.0);
        let b = det("knife", 0.8, 50.0, 50.0, 60.0, 60.0);
        assert_eq!(iou(&a, &b), 0.0);
    }

    #[test]
    fn nms_suppresses_overlapping_same_label() {
        let dets = vec![
            det("knife", 0.6, 10.0, 10.0, 50.0, 50.0),
            det("knife", 0.9, 12.0, 12.0, 52.0, 52.0),
        ];
        let kept = non_maximum_suppression(dets, 0.45);
        assert_eq!(kept.len(), 1);
        assert!((kept[0].confidence - 0.9).abs() < 1e-6);
    }

    #[test]
    fn nms_keeps_overlapping_different_labels() {
        let dets = vec![
            det("knife", 0.9, 10.0, 10.0, 50.0, 50.0),
            det("scissors", 0.8, 12.0, 12.0, 52.0, 52.0),
        ];
        let kept = non_maximum_suppression(dets, 0.45);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn nms_orders_by_confidence() {
        let dets = vec![
            det("person", 0.5, 0.0, 0.0, 10.0, 10.0),
            det("person", 0.9, 100.0, 100.0, 110.0, 110.0),
        ];
        let kept = non_maximum_suppression(dets, 0.45);
        assert_eq!(kept.len(), 2);
        assert!(kept[0].confidence > kept[1].confidence);
    }

    #[test]
    fn missing_model_is_an_error() {
        let config = YoloConfig {
            model_path: "does/not/exist.onnx".to_string(),
            ..YoloConfig::default()
        };
        match YoloDetector::new(config) {
            Err(DetectError::ModelNotFound(path)) => assert!(path.contains("exist.onnx")),
            other => panic!("expected ModelNotFound, got {:?}", other.map(|_| ())),
        }
    }
}
