//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Invalid base64 image: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("Image decode failed: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("Detection failed: {0}")]
    Detection(#[from] vigil_detect::DetectError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Error body shape the polling front-end expects: any request-processing
/// failure surfaces as a 500 carrying the error text and `detected: false`.
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    detected: bool,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
            detected: false,
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_error_maps_to_500() {
        for err in [
            ApiError::MissingField("image"),
            ApiError::internal("boom"),
        ] {
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}
