//! Review-case storage.

use crate::StoreError;
use vita_types::{CaseId, OfficerId, ReviewCase, ReviewDecision, Timestamp};

/// Storage for human-adjudication review cases.
pub trait ReviewStore: Send + Sync {
    /// Persist a freshly opened case. Each escalation is a new case.
    fn create(&self, case: &ReviewCase) -> Result<(), StoreError>;

    fn get(&self, case_id: &CaseId) -> Result<ReviewCase, StoreError>;

    /// Apply an officer decision to a PENDING case, returning the decided
    /// case.
    ///
    /// Conditional update: fails with `AlreadyDecided` (leaving the row
    /// untouched) unless the stored status is still PENDING, so a case can
    /// be decided exactly once even under concurrent officers.
    fn decide(
        &self,
        case_id: &CaseId,
        decision: ReviewDecision,
        officer: &OfficerId,
        now: Timestamp,
    ) -> Result<ReviewCase, StoreError>;

    /// All cases still awaiting a decision, oldest first.
    fn list_pending(&self) -> Result<Vec<ReviewCase>, StoreError>;
}
