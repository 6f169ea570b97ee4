//! HTTP client for the hosted specialist detection service.
//!
//! The specialist model is trained specifically on the suspicious-object
//! classes and served by a hosted inference endpoint. Each frame is posted as
//! a base64 payload; the service answers with center-based pixel boxes and
//! percentage confidences, which this crate passes through untouched — scaling
//! into [0, 1] happens in the merge core.

pub mod client;
pub mod config;
pub mod error;

pub use client::RemoteDetector;
pub use config::RemoteConfig;
pub use error::{RemoteError, RemoteResult};
