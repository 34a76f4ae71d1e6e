use thiserror::Error;
use vita_store::StoreError;
use vita_types::{CaseId, Modality, SubjectId};

use crate::similarity::SimilarityError;

/// The full error taxonomy of the re-verification core.
///
/// `VerificationFailed`, `PinNotAllowed` and `ReplayDetected` are protocol
/// violations: they are never downgraded to a soft "pending review"
/// response, even though they additionally open a review case. Soft,
/// inconclusive outcomes (low similarity, no face detected) are not errors
/// at all; they surface through [`crate::similarity::FaceOutcome`].
#[derive(Debug, Error)]
pub enum VerificationError {
    /// Missing or invalid caller identity. Fatal to the request, no side
    /// effects.
    #[error("caller identity is missing or invalid")]
    Unauthorized,

    /// A credential already exists for this (subject, modality).
    #[error("subject {subject} already has a {modality} credential enrolled")]
    AlreadyEnrolled {
        subject: SubjectId,
        modality: Modality,
    },

    /// The ceremony challenge is missing or past its TTL. The caller must
    /// restart from issuing options.
    #[error("ceremony challenge is missing or expired")]
    ChallengeExpired,

    /// Signature, origin or relying-party binding did not check out.
    /// Treated as a potential attack and logged.
    #[error("ceremony response failed verification: {0}")]
    VerificationFailed(String),

    /// The signature is valid but the authenticator reported mere user
    /// presence. Rejected by policy, not a bug.
    #[error("assertion reports user presence only; user verification is required")]
    PinNotAllowed,

    /// The assertion's counter did not advance past the stored one. A
    /// cloned or replayed credential is the likely cause.
    #[error("assertion counter {reported} is not greater than stored counter {stored}")]
    ReplayDetected { reported: u64, stored: u64 },

    /// Nothing is enrolled for this (subject, modality). Recoverable by
    /// directing the caller to registration.
    #[error("subject {subject} has no {modality} credential enrolled")]
    NoCredentials {
        subject: SubjectId,
        modality: Modality,
    },

    #[error("review case {0} not found")]
    CaseNotFound(CaseId),

    /// A review case may be decided exactly once.
    #[error("review case {0} is already decided")]
    AlreadyDecided(CaseId),

    /// The external comparison collaborator failed outright. Distinct from
    /// an inconclusive comparison, which is a normal outcome.
    #[error("similarity comparison failed: {0}")]
    Similarity(#[from] SimilarityError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
