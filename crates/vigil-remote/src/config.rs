//! Specialist service configuration.

use std::time::Duration;

/// Configuration for the hosted detection endpoint.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Base URL of the inference service
    pub base_url: String,
    /// API key for the hosted workspace
    pub api_key: String,
    /// Model/project identifier
    pub model_id: String,
    /// Deployed model version
    pub model_version: u32,
    /// Minimum confidence (percentage) the service should report
    pub confidence: u32,
    /// Maximum box overlap (percentage) the service should allow
    pub overlap: u32,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://detect.roboflow.com".to_string(),
            api_key: String::new(),
            model_id: String::new(),
            model_version: 1,
            confidence: 40,
            overlap: 30,
            timeout: Duration::from_secs(15),
        }
    }
}

impl RemoteConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            base_url: std::env::var("REMOTE_API_URL").unwrap_or(default.base_url),
            api_key: std::env::var("REMOTE_API_KEY").unwrap_or_default(),
            model_id: std::env::var("REMOTE_MODEL_ID").unwrap_or_default(),
            model_version: std::env::var("REMOTE_MODEL_VERSION")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.model_version),
            confidence: std::env::var("REMOTE_CONFIDENCE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.confidence),
            overlap: std::env::var("REMOTE_OVERLAP")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.overlap),
            timeout: Duration::from_secs(
                std::env::var("REMOTE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(15),
            ),
        }
    }

    /// Whether enough is configured to attempt a call.
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.model_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_service_contract() {
        let config = RemoteConfig::default();
        assert_eq!(config.confidence, 40);
        assert_eq!(config.overlap, 30);
        assert_eq!(config.model_version, 1);
        assert!(!config.is_configured());
    }

    #[test]
    fn configured_requires_key_and_model() {
        let config = RemoteConfig {
            api_key: "key".to_string(),
            model_id: "suspicious-objects".to_string(),
            ..RemoteConfig::default()
        };
        assert!(config.is_configured());
    }
}
