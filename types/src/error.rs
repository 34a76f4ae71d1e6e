use thiserror::Error;

#[derive(Debug, Error)]
pub enum TypeError {
    #[error("unknown modality: {0}")]
    UnknownModality(String),

    #[error("unknown ceremony purpose: {0}")]
    UnknownPurpose(String),

    #[error("unknown review decision: {0}")]
    UnknownDecision(String),

    #[error("invalid hex encoding: {0}")]
    InvalidHex(String),

    #[error("invalid length: expected {expected} bytes, got {got}")]
    InvalidLength { expected: usize, got: usize },
}
