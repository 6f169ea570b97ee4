//! Capability seams over the two detection backends.
//!
//! Either backend can be substituted or mocked in tests without touching the
//! merge logic; the handlers only see these traits.

use async_trait::async_trait;
use image::DynamicImage;

use vigil_detect::{DetectResult, YoloDetector};
use vigil_models::{CenterDetection, CornerDetection};
use vigil_remote::{RemoteDetector, RemoteResult};

/// Generic multi-class detector: decoded frame in, pixel-space corner boxes
/// out. A failure here fails the whole request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GeneralBackend: Send + Sync {
    async fn detect(&self, frame: &DynamicImage) -> DetectResult<Vec<CornerDetection>>;

    /// Backend name for logging.
    fn name(&self) -> &'static str;

    /// Whether the backend can serve traffic.
    fn ready(&self) -> bool;
}

/// Specialist detector: encoded frame bytes in, center-form boxes with
/// percentage confidences out. Failures are swallowed by the caller, never by
/// the backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpecialistBackend: Send + Sync {
    async fn detect(&self, image: &[u8]) -> RemoteResult<Vec<CenterDetection>>;

    /// Backend name for logging.
    fn name(&self) -> &'static str;

    /// Whether the backend can serve traffic.
    fn ready(&self) -> bool;
}

#[async_trait]
impl GeneralBackend for YoloDetector {
    async fn detect(&self, frame: &DynamicImage) -> DetectResult<Vec<CornerDetection>> {
        YoloDetector::detect(self, frame)
    }

    fn name(&self) -> &'static str {
        "yolo-onnx"
    }

    fn ready(&self) -> bool {
        // The session loaded at startup or the process wouldn't be serving.
        true
    }
}

#[async_trait]
impl SpecialistBackend for RemoteDetector {
    async fn detect(&self, image: &[u8]) -> RemoteResult<Vec<CenterDetection>> {
        RemoteDetector::detect(self, image).await
    }

    fn name(&self) -> &'static str {
        "hosted-specialist"
    }

    fn ready(&self) -> bool {
        self.is_configured()
    }
}
