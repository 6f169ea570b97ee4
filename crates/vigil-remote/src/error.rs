//! Error types for the specialist detection client.

use thiserror::Error;

/// Result type for remote detection calls.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Errors from the hosted detection service.
///
/// The API layer treats any of these as "zero additional detections"; this
/// crate never swallows them itself.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Service returned {status}: {body}")]
    Status { status: u16, body: String },
}
