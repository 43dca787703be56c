use std::sync::Arc;

use axum::{extract::State, response::Json, Json as JsonExtractor};

use crate::error::ApiError;
use crate::services::compute::{ComputeBackend, ComputeRequest, ComputeResponse};

/// Apply the secure linear transform to a coefficient vector
///
/// The caller sends a flattened, scale-normalized frequency-domain vector
/// of canvas-area length; the response is the transformed vector of equal
/// length. Input length and finiteness are validated before the backend
/// runs.
#[utoipa::path(
    post,
    path = "/api/compute",
    request_body = ComputeRequest,
    responses(
        (status = 200, description = "Transformed vector", body = ComputeResponse),
        (status = 400, description = "Wrong vector length or non-finite values"),
    ),
    tag = "Compute"
)]
pub async fn handle_compute(
    State(backend): State<Arc<dyn ComputeBackend>>,
    JsonExtractor(request): JsonExtractor<ComputeRequest>,
) -> Result<Json<ComputeResponse>, ApiError> {
    tracing::debug!(len = request.input.len(), "Compute request received");

    let output = backend.forward(&request.input)?;

    tracing::info!(len = output.len(), "Compute request served");
    Ok(Json(ComputeResponse { output }))
}
