//! Specialist detection client.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use vigil_models::CenterDetection;

use crate::config::RemoteConfig;
use crate::error::{RemoteError, RemoteResult};

/// One prediction as reported by the hosted service.
#[derive(Debug, Deserialize)]
struct Prediction {
    /// Box center X in pixels
    x: f32,
    /// Box center Y in pixels
    y: f32,
    width: f32,
    height: f32,
    /// Confidence as a percentage
    confidence: f32,
    #[serde(rename = "class")]
    label: String,
}

#[derive(Debug, Deserialize)]
struct InferenceResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

/// Client for the hosted specialist detection endpoint.
///
/// One instance is created at startup and shared by all requests; the inner
/// `reqwest::Client` pools connections internally.
pub struct RemoteDetector {
    http: Client,
    config: RemoteConfig,
}

impl RemoteDetector {
    /// Build a client from config.
    pub fn new(config: RemoteConfig) -> RemoteResult<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    /// Build a client from environment variables.
    pub fn from_env() -> RemoteResult<Self> {
        Self::new(RemoteConfig::from_env())
    }

    /// Get the configuration.
    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    /// Whether an API key and model id are configured.
    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    /// Run specialist detection on an encoded (JPEG/PNG) frame.
    ///
    /// The frame is posted base64-encoded to
    /// `{base_url}/{model_id}/{model_version}` with the configured
    /// confidence/overlap thresholds as query parameters.
    pub async fn detect(&self, image: &[u8]) -> RemoteResult<Vec<CenterDetection>> {
        let url = format!(
            "{}/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.model_id,
            self.config.model_version,
        );

        let response = self
            .http
            .post(&url)
            .query(&[("api_key", self.config.api_key.as_str())])
            .query(&[
                ("confidence", self.config.confidence),
                ("overlap", self.config.overlap),
            ])
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(BASE64.encode(image))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let inference: InferenceResponse = response.json().await?;
        debug!(
            count = inference.predictions.len(),
            "Specialist detection completed"
        );

        Ok(inference
            .predictions
            .into_iter()
            .map(|p| CenterDetection {
                x: p.x,
                y: p.y,
                width: p.width,
                height: p.height,
                confidence: p.confidence,
                label: p.label,
            })
            .collect())
    }
}
