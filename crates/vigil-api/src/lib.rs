//! Axum HTTP API server.
//!
//! This crate provides:
//! - The `POST /detect` per-frame detection endpoint
//! - Dual-backend wiring (local ONNX model + hosted specialist service)
//! - Rate limiting and security headers
//! - Prometheus metrics

pub mod backends;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use backends::{GeneralBackend, SpecialistBackend};
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
