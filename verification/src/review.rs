//! Review escalation workflow: officer decisions on pending cases.

use tracing::{info, warn};

use vita_store::{AttemptStore, ReviewStore, StoreError, SubjectStore};
use vita_types::{
    AttemptOutcome, CaseId, OfficerId, ReviewCase, ReviewDecision, Standing, Timestamp,
    VerificationAttempt, VerificationMethod, VerificationParams,
};

use crate::error::VerificationError;
use crate::outcomes::OutcomeRecorder;

pub struct ReviewWorkflow<'a> {
    pub reviews: &'a dyn ReviewStore,
    pub attempts: &'a dyn AttemptStore,
    pub subjects: &'a dyn SubjectStore,
    pub params: &'a VerificationParams,
}

impl<'a> ReviewWorkflow<'a> {
    /// Apply an officer's decision to a pending case.
    ///
    /// Exactly-once: the store refuses a second decision. On APPROVE the
    /// subject is verified with the officer-review interval; on REJECT the
    /// subject is flagged and nothing retries automatically, a human must
    /// re-initiate.
    pub fn decide(
        &self,
        case_id: &CaseId,
        decision: ReviewDecision,
        officer: &OfficerId,
        now: Timestamp,
    ) -> Result<ReviewCase, VerificationError> {
        let case = self
            .reviews
            .decide(case_id, decision, officer, now)
            .map_err(|e| match e {
                StoreError::NotFound(_) => VerificationError::CaseNotFound(case_id.clone()),
                StoreError::AlreadyDecided(_) => {
                    VerificationError::AlreadyDecided(case_id.clone())
                }
                other => other.into(),
            })?;

        match decision {
            ReviewDecision::Approve => {
                let recorder = OutcomeRecorder {
                    attempts: self.attempts,
                    subjects: self.subjects,
                    reviews: self.reviews,
                    params: self.params,
                };
                recorder.record_success(
                    &case.subject,
                    VerificationMethod::OfficerReview,
                    None,
                    now,
                )?;
            }
            ReviewDecision::Reject => {
                self.subjects
                    .set_standing(&case.subject, Standing::Flagged, None)?;
                let attempt = VerificationAttempt {
                    subject: case.subject.clone(),
                    method: VerificationMethod::OfficerReview,
                    modality: None,
                    outcome: AttemptOutcome::Failed,
                    at: now,
                    next_due: None,
                };
                self.attempts.append(&attempt)?;
                warn!(subject = %case.subject, case = %case.id, officer = %officer, "review rejected, subject flagged");
            }
        }

        info!(case = %case.id, officer = %officer, status = case.status.as_str(), "review case decided");
        Ok(case)
    }
}
