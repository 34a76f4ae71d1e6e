//! RPC error types and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use vita_verification::VerificationError;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Verification(#[from] VerificationError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("server error: {0}")]
    Server(String),
}

impl RpcError {
    /// HTTP status and stable machine-readable code for this error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            RpcError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
            RpcError::Verification(e) => match e {
                VerificationError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
                VerificationError::AlreadyEnrolled { .. } => {
                    (StatusCode::CONFLICT, "ALREADY_ENROLLED")
                }
                VerificationError::AlreadyDecided(_) => (StatusCode::CONFLICT, "ALREADY_DECIDED"),
                VerificationError::ChallengeExpired => (StatusCode::GONE, "CHALLENGE_EXPIRED"),
                VerificationError::NoCredentials { .. } => {
                    (StatusCode::NOT_FOUND, "NO_CREDENTIALS")
                }
                VerificationError::CaseNotFound(_) => (StatusCode::NOT_FOUND, "CASE_NOT_FOUND"),
                VerificationError::VerificationFailed(_) => {
                    (StatusCode::FORBIDDEN, "VERIFICATION_FAILED")
                }
                VerificationError::PinNotAllowed => (StatusCode::FORBIDDEN, "PIN_NOT_ALLOWED"),
                VerificationError::ReplayDetected { .. } => {
                    (StatusCode::FORBIDDEN, "REPLAY_DETECTED")
                }
                VerificationError::Similarity(_) => {
                    (StatusCode::BAD_GATEWAY, "COMPARISON_UNAVAILABLE")
                }
                VerificationError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORE_ERROR"),
            },
            RpcError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
            RpcError::Server(_) => (StatusCode::INTERNAL_SERVER_ERROR, "SERVER_ERROR"),
        }
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let body = Json(json!({
            "error": code,
            "message": self.to_string(),
        }));
        (status, body).into_response()
    }
}
