//! Downstream effects of a verification outcome: the ledger row, the
//! subject's standing and next-due date, and review-case escalation.

use tracing::{error, info};

use vita_store::{AttemptStore, ReviewStore, SubjectStore};
use vita_types::{
    AttemptOutcome, CaseId, Modality, ReviewCase, Standing, SubjectId, Timestamp,
    VerificationAttempt, VerificationMethod, VerificationParams,
};

use crate::error::VerificationError;

pub struct OutcomeRecorder<'a> {
    pub attempts: &'a dyn AttemptStore,
    pub subjects: &'a dyn SubjectStore,
    pub reviews: &'a dyn ReviewStore,
    pub params: &'a VerificationParams,
}

impl<'a> OutcomeRecorder<'a> {
    /// The re-verification interval a successful check of `method` buys.
    ///
    /// Deliberately asymmetric: a credential ceremony is worth years, a
    /// similarity match or officer approval only months.
    fn interval_secs(&self, method: VerificationMethod) -> u64 {
        match method {
            VerificationMethod::CredentialKey => self.params.credential_interval_secs,
            VerificationMethod::FaceSimilarity | VerificationMethod::OfficerReview => {
                self.params.similarity_interval_secs
            }
        }
    }

    /// Record a successful verification: SUCCESS ledger row, standing to
    /// VERIFIED, next-due advanced. Returns the new next-due date.
    ///
    /// No transaction spans the ledger and the subject record. A ledger
    /// append failing after the verification itself succeeded is logged
    /// and tolerated, never rolled back.
    pub fn record_success(
        &self,
        subject: &SubjectId,
        method: VerificationMethod,
        modality: Option<Modality>,
        now: Timestamp,
    ) -> Result<Timestamp, VerificationError> {
        let next_due = now.plus(self.interval_secs(method));
        let attempt = VerificationAttempt {
            subject: subject.clone(),
            method,
            modality,
            outcome: AttemptOutcome::Success,
            at: now,
            next_due: Some(next_due),
        };
        if let Err(e) = self.attempts.append(&attempt) {
            error!(%subject, ?method, "ledger append failed after successful verification: {e}");
        }
        self.subjects
            .set_standing(subject, Standing::Verified, Some(next_due))?;
        info!(%subject, method = method.as_str(), %next_due, "verification succeeded");
        Ok(next_due)
    }

    /// Escalate a failed or inconclusive check to human review.
    ///
    /// Appends a ledger row with the given outcome and opens a fresh
    /// PENDING case. Standing is left untouched; only an officer decision
    /// moves it.
    pub fn escalate(
        &self,
        subject: &SubjectId,
        method: VerificationMethod,
        modality: Option<Modality>,
        outcome: AttemptOutcome,
        artifact_ref: Option<String>,
        now: Timestamp,
    ) -> Result<ReviewCase, VerificationError> {
        let case = ReviewCase::open(
            CaseId::new(vita_crypto::random_case_id()),
            subject.clone(),
            artifact_ref,
            now,
        );
        self.reviews.create(&case)?;

        let attempt = VerificationAttempt {
            subject: subject.clone(),
            method,
            modality,
            outcome,
            at: now,
            next_due: None,
        };
        if let Err(e) = self.attempts.append(&attempt) {
            error!(%subject, ?method, "ledger append failed during escalation: {e}");
        }
        info!(%subject, method = method.as_str(), case = %case.id, "escalated to review");
        Ok(case)
    }
}
