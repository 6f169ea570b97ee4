//! Application state.

use std::sync::Arc;

use tracing::{info, warn};

use vigil_detect::YoloDetector;
use vigil_models::SuspiciousSet;
use vigil_remote::RemoteDetector;

use crate::backends::{GeneralBackend, SpecialistBackend};
use crate::config::ApiConfig;

/// Shared application state.
///
/// Built once before serving traffic and never mutated afterwards; every
/// request sees the same detector handles and suspicious-class set.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub general: Arc<dyn GeneralBackend>,
    pub specialist: Arc<dyn SpecialistBackend>,
    pub suspicious: Arc<SuspiciousSet>,
}

impl AppState {
    /// Create new application state, loading the local model from disk.
    pub fn new(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let general = YoloDetector::new(config.model.clone())?;
        let specialist = RemoteDetector::from_env()?;
        if !specialist.is_configured() {
            warn!("Specialist backend not configured; alerts rely on the local model only");
        }

        let suspicious = match config.suspicious_classes.as_deref() {
            Some(csv) => SuspiciousSet::from_csv(csv),
            None => SuspiciousSet::default(),
        };
        info!(
            classes = suspicious.len(),
            "Suspicious-class set loaded"
        );

        Ok(Self {
            config,
            general: Arc::new(general),
            specialist: Arc::new(specialist),
            suspicious: Arc::new(suspicious),
        })
    }

    /// Build state around externally supplied backends (used by tests).
    pub fn with_backends(
        config: ApiConfig,
        general: Arc<dyn GeneralBackend>,
        specialist: Arc<dyn SpecialistBackend>,
        suspicious: SuspiciousSet,
    ) -> Self {
        Self {
            config,
            general,
            specialist,
            suspicious: Arc::new(suspicious),
        }
    }
}
