//! Per-frame detection handler.

use std::time::Instant;

use axum::extract::State;
use axum::Json;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{Local, Utc};
use image::GenericImageView;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use vigil_models::{merge_detections, AlertDecision, Detection, FrameSize, NormalizedRect};

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

/// Detection request from the surveillance front-end.
#[derive(Debug, Deserialize)]
pub struct DetectRequest {
    /// Base64-encoded image bytes (JPEG/PNG)
    pub image: Option<String>,
    /// Identifier of the submitting camera
    pub camera_id: Option<String>,
}

/// Detection response.
#[derive(Debug, Serialize)]
pub struct DetectResponse {
    pub detected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<NormalizedRect>,
    pub all_detections: Vec<Detection>,
}

impl DetectResponse {
    fn from_decision(decision: AlertDecision, camera_id: &str) -> Self {
        let timestamp = Local::now().format("%Y-%m-%dT%H:%M:%S").to_string();

        match decision {
            AlertDecision {
                detected: true,
                object_type: Some(object_type),
                confidence: Some(confidence),
                bounding_box,
                all_detections,
            } => {
                // Percentage is truncated, not rounded
                let message = format!(
                    "Alert: {} detected at Camera {} ({}% confidence)",
                    object_type,
                    camera_id,
                    (confidence * 100.0) as u32
                );
                Self {
                    detected: true,
                    alert_id: Some(format!("alert-{}", Utc::now().timestamp_millis())),
                    object_type: Some(object_type),
                    confidence: Some(confidence),
                    timestamp,
                    message: Some(message),
                    bounding_box,
                    all_detections,
                }
            }
            AlertDecision { all_detections, .. } => Self {
                detected: false,
                alert_id: None,
                object_type: None,
                confidence: None,
                timestamp,
                message: None,
                bounding_box: None,
                all_detections,
            },
        }
    }
}

/// Run both detection backends on a frame and decide whether to alert.
///
/// The general backend's failure fails the request; the specialist backend's
/// failure is logged and treated as zero additional detections.
pub async fn detect_frame(
    State(state): State<AppState>,
    Json(request): Json<DetectRequest>,
) -> ApiResult<Json<DetectResponse>> {
    let image_b64 = request.image.ok_or(ApiError::MissingField("image"))?;
    let camera_id = request.camera_id.unwrap_or_else(|| "unknown".to_string());

    let image_bytes = BASE64.decode(image_b64.as_bytes())?;
    let frame_img = image::load_from_memory(&image_bytes)?;
    let (width, height) = frame_img.dimensions();
    let frame = FrameSize::new(width, height);

    let start = Instant::now();
    let general = state.general.detect(&frame_img).await?;
    metrics::record_backend_duration(state.general.name(), start.elapsed().as_secs_f64());

    let start = Instant::now();
    let specialist = match state.specialist.detect(&image_bytes).await {
        Ok(detections) => {
            metrics::record_backend_duration(
                state.specialist.name(),
                start.elapsed().as_secs_f64(),
            );
            detections
        }
        Err(e) => {
            warn!(
                backend = state.specialist.name(),
                error = %e,
                "Specialist detection failed; continuing with local results only"
            );
            metrics::record_backend_failure(state.specialist.name());
            Vec::new()
        }
    };

    let decision = merge_detections(frame, &general, &specialist, &state.suspicious);
    metrics::record_frame_processed(decision.detected);

    if decision.detected {
        let object_type = decision.object_type.as_deref().unwrap_or("unknown");
        metrics::record_alert(object_type);
        info!(
            camera_id = %camera_id,
            object_type = %object_type,
            confidence = decision.confidence.unwrap_or(0.0),
            "Suspicious object detected"
        );
    }

    Ok(Json(DetectResponse::from_decision(decision, &camera_id)))
}
