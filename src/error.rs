use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors surfaced by the HTTP API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid input vector: {0}")]
    InvalidInput(String),

    #[error("Compute error: {0}")]
    Compute(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<crate::services::compute::ComputeError> for ApiError {
    fn from(e: crate::services::compute::ComputeError) -> Self {
        use crate::services::compute::ComputeError;
        match e {
            ComputeError::LengthMismatch { .. } | ComputeError::NonFinite => {
                ApiError::InvalidInput(e.to_string())
            }
            other => ApiError::Compute(other.to_string()),
        }
    }
}

/// Errors from the watermarking pipeline (decode, embed, re-encode,
/// compute boundary, artifact writing).
///
/// A lossy re-encode failure is fatal to that evaluation pass only; the
/// embedding result it was evaluating remains valid.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to encode image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("lossy re-encode failed: {0}")]
    Recompress(#[source] image::ImageError),

    #[error("compute backend error: {0}")]
    Compute(#[from] crate::services::compute::ComputeError),

    #[error("watermark error: {0}")]
    Mark(#[from] qim_mark::MarkError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("results serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::InvalidInput(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Compute(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "status": status.as_u16(),
            "error": message,
        }));

        (status, body).into_response()
    }
}
