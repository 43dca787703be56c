//! The privacy-preserving compute boundary.
//!
//! The collaborator accepts a flattened, scale-normalized frequency-domain
//! vector and returns a vector of equal length: the result of an opaque
//! linear operation evaluated under encryption. The core assumes nothing
//! about the operation beyond shape preservation and approximate
//! linearity, so the boundary is a trait with two implementations -- an
//! in-process identity stand-in and a blocking HTTP client for a remote
//! service.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Wire request for the compute endpoint: one flattened coefficient
/// vector.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComputeRequest {
    /// Flattened row-major frequency coefficients, canvas-area long
    pub input: Vec<f64>,
}

/// Wire response: the transformed vector, same length as the input.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComputeResponse {
    /// Transformed coefficients
    pub output: Vec<f64>,
}

/// Errors at the compute boundary.
#[derive(Debug, Error)]
pub enum ComputeError {
    #[error("input length {actual} does not match the expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("input contains non-finite values")]
    NonFinite,

    #[error("compute request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("compute endpoint returned {status}: {message}")]
    Endpoint { status: u16, message: String },
}

/// An opaque linear operation over fixed-length coefficient vectors.
///
/// Implementations must preserve vector length. Callers needing
/// resilience add their own timeout/retry wrapper; this layer performs a
/// single round trip.
pub trait ComputeBackend: Send + Sync {
    /// Apply the operation to one flattened coefficient vector.
    fn forward(&self, input: &[f64]) -> Result<Vec<f64>, ComputeError>;

    /// Vector length this backend was built for.
    fn expected_len(&self) -> usize;
}

/// In-process stand-in: the identity operation.
///
/// Validates shape and finiteness exactly like a real backend would, so
/// swapping in a non-trivial operator changes nothing for callers.
pub struct IdentityCompute {
    len: usize,
}

impl IdentityCompute {
    pub fn new(len: usize) -> Self {
        Self { len }
    }
}

impl ComputeBackend for IdentityCompute {
    fn forward(&self, input: &[f64]) -> Result<Vec<f64>, ComputeError> {
        validate(input, self.len)?;
        Ok(input.to_vec())
    }

    fn expected_len(&self) -> usize {
        self.len
    }
}

/// Blocking HTTP client for a remote compute service.
///
/// POSTs `{"input": [...]}` to the configured endpoint and expects
/// `{"output": [...]}` of equal length back.
pub struct RemoteCompute {
    client: reqwest::blocking::Client,
    url: String,
    len: usize,
}

impl RemoteCompute {
    pub fn new(url: impl Into<String>, len: usize) -> Result<Self, ComputeError> {
        let client = reqwest::blocking::Client::builder().build()?;
        Ok(Self {
            client,
            url: url.into(),
            len,
        })
    }
}

impl ComputeBackend for RemoteCompute {
    fn forward(&self, input: &[f64]) -> Result<Vec<f64>, ComputeError> {
        validate(input, self.len)?;

        let response = self
            .client
            .post(&self.url)
            .json(&ComputeRequest {
                input: input.to_vec(),
            })
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            return Err(ComputeError::Endpoint {
                status: status.as_u16(),
                message,
            });
        }

        let body: ComputeResponse = response.json()?;
        if body.output.len() != self.len {
            return Err(ComputeError::LengthMismatch {
                expected: self.len,
                actual: body.output.len(),
            });
        }
        tracing::debug!(url = %self.url, len = self.len, "Remote compute round trip complete");
        Ok(body.output)
    }

    fn expected_len(&self) -> usize {
        self.len
    }
}

fn validate(input: &[f64], expected: usize) -> Result<(), ComputeError> {
    if input.len() != expected {
        return Err(ComputeError::LengthMismatch {
            expected,
            actual: input.len(),
        });
    }
    if input.iter().any(|v| !v.is_finite()) {
        return Err(ComputeError::NonFinite);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_returns_input_unchanged() {
        let backend = IdentityCompute::new(4);
        let input = [0.5, -1.25, 3.0, 0.0];
        assert_eq!(backend.forward(&input).unwrap(), input.to_vec());
    }

    #[test]
    fn identity_rejects_wrong_length() {
        let backend = IdentityCompute::new(4);
        let err = backend.forward(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(
            err,
            ComputeError::LengthMismatch {
                expected: 4,
                actual: 2
            }
        ));
    }

    #[test]
    fn identity_rejects_non_finite_values() {
        let backend = IdentityCompute::new(3);
        let err = backend.forward(&[1.0, f64::NAN, 0.0]).unwrap_err();
        assert!(matches!(err, ComputeError::NonFinite));
    }

    #[test]
    fn wire_types_round_trip_through_json() {
        let request = ComputeRequest {
            input: vec![1.0, 2.5],
        };
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"input":[1.0,2.5]}"#);

        let response: ComputeResponse = serde_json::from_str(r#"{"output":[0.5,0.25]}"#).unwrap();
        assert_eq!(response.output, vec![0.5, 0.25]);
    }
}
