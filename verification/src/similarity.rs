//! Face similarity verification seam.
//!
//! Not a cryptographic ceremony: a freshly captured image is compared
//! against the subject's stored reference image by an external
//! collaborator, and a score threshold decides the outcome. Anything
//! inconclusive degrades to human review instead of failing the request.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use vita_types::{ReviewCase, Timestamp};

/// Outcome of one image comparison, as reported by the collaborator.
///
/// Closed variants: an absent face is not a score of zero, and callers
/// cannot confuse the two.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    /// Similarity score in `0..=100`.
    Score(u8),
    /// No face was detected in one of the images.
    NoFaceDetected,
}

/// The comparison collaborator failed outright (network, service fault).
///
/// Distinct from an inconclusive comparison, which is a [`Comparison`]
/// value, not an error.
#[derive(Debug, Error)]
pub enum SimilarityError {
    #[error("comparison service error: {0}")]
    Service(String),
}

/// External face-comparison collaborator.
///
/// One blocking round-trip per call; retry policy, if any, belongs to the
/// implementation, not to this protocol.
pub trait SimilarityComparer: Send + Sync {
    fn compare(&self, reference: &[u8], probe: &[u8]) -> Result<Comparison, SimilarityError>;
}

/// How a face verification request resolved. Both variants are handled
/// outcomes; neither is an error at the request level.
#[derive(Clone, Debug)]
pub enum FaceOutcome {
    /// Score met the threshold; ledger, standing and next-due updated.
    Accepted { score: u8, next_due: Timestamp },
    /// Low score or no detected face; a review case was opened.
    Escalated {
        score: Option<u8>,
        case: ReviewCase,
    },
}
