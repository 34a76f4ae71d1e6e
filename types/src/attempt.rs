//! Verification ledger rows.

use crate::modality::Modality;
use crate::subject::SubjectId;
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};

/// How a verification attempt was performed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationMethod {
    /// Challenge-response against an enrolled credential key.
    CredentialKey,
    /// Face-similarity comparison against the stored reference image.
    FaceSimilarity,
    /// A human officer's decision on an escalated review case.
    OfficerReview,
}

impl VerificationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationMethod::CredentialKey => "CREDENTIAL_KEY",
            VerificationMethod::FaceSimilarity => "FACE_SIMILARITY",
            VerificationMethod::OfficerReview => "OFFICER_REVIEW",
        }
    }
}

/// Outcome of one verification attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttemptOutcome {
    Success,
    Failed,
    /// Inconclusive; a review case was opened for an officer.
    PendingReview,
}

impl AttemptOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttemptOutcome::Success => "SUCCESS",
            AttemptOutcome::Failed => "FAILED",
            AttemptOutcome::PendingReview => "PENDING_REVIEW",
        }
    }
}

/// One row of the append-only verification ledger. Never mutated.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VerificationAttempt {
    pub subject: SubjectId,
    pub method: VerificationMethod,
    /// The modality involved, where one applies (credential ceremonies).
    pub modality: Option<Modality>,
    pub outcome: AttemptOutcome,
    pub at: Timestamp,
    /// Set only on `Success`.
    pub next_due: Option<Timestamp>,
}
