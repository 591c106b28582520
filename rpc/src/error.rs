//! RPC error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use sprint_consensus::{SnapshotError, ValidationError};
use thiserror::Error;

/// Errors surfaced by RPC handlers.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl RpcError {
    fn code(&self) -> &'static str {
        match self {
            RpcError::InvalidRequest(_) => "invalid_request",
            RpcError::Validation(e) => match e {
                ValidationError::BadSignature => "bad_signature",
                ValidationError::NotInValidatorSet(_) => "not_in_validator_set",
                ValidationError::Pending(_) => "pending",
                ValidationError::NonceMismatch { .. } => "nonce_mismatch",
                ValidationError::NotFinalisedPrev => "not_finalised_prev",
                ValidationError::InsufficientBalance { .. } => "insufficient_balance",
                ValidationError::InvalidRecovery(_) => "invalid_recovery",
            },
            RpcError::Snapshot(SnapshotError::MissingNotarisation(_)) => "missing_notarisation",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            RpcError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            RpcError::Validation(e) => match e {
                ValidationError::BadSignature | ValidationError::NotInValidatorSet(_) => {
                    StatusCode::BAD_REQUEST
                }
                ValidationError::Pending(_)
                | ValidationError::NonceMismatch { .. }
                | ValidationError::NotFinalisedPrev => StatusCode::CONFLICT,
                ValidationError::InsufficientBalance { .. }
                | ValidationError::InvalidRecovery(_) => StatusCode::UNPROCESSABLE_ENTITY,
            },
            // A snapshot hole is an internal invariant violation.
            RpcError::Snapshot(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.code(),
            message: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
