//! Health check handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::state::AppState;

/// Health response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}

/// Health check endpoint (liveness probe).
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Readiness check response.
#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub checks: ReadinessChecks,
}

#[derive(Serialize)]
pub struct ReadinessChecks {
    pub general_backend: CheckStatus,
    pub specialist_backend: CheckStatus,
}

#[derive(Serialize)]
pub struct CheckStatus {
    pub status: String,
    pub backend: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CheckStatus {
    fn ok(backend: &'static str) -> Self {
        Self {
            status: "ok".to_string(),
            backend,
            error: None,
        }
    }

    fn error(backend: &'static str, msg: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            backend,
            error: Some(msg.into()),
        }
    }
}

/// Readiness check endpoint (readiness probe).
///
/// The general backend gates readiness; the specialist backend is reported
/// but does not, since requests are served from local results when it is
/// down (the same policy the detect pipeline applies).
pub async fn ready(
    State(state): State<AppState>,
) -> Result<Json<ReadinessResponse>, (StatusCode, Json<ReadinessResponse>)> {
    let general_check = if state.general.ready() {
        CheckStatus::ok(state.general.name())
    } else {
        CheckStatus::error(state.general.name(), "model unavailable")
    };

    let specialist_check = if state.specialist.ready() {
        CheckStatus::ok(state.specialist.name())
    } else {
        CheckStatus::error(state.specialist.name(), "not configured")
    };

    let ready = general_check.status == "ok";
    let response = ReadinessResponse {
        status: if ready { "ready" } else { "degraded" }.to_string(),
        checks: ReadinessChecks {
            general_backend: general_check,
            specialist_backend: specialist_check,
        },
    };

    if ready {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}
