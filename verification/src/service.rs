//! The top-level verification service: one handle owning the store and
//! collaborator seams, exposing every operation of the re-verification
//! surface. Constructed once at startup and shared by reference across
//! request handlers.

use std::sync::Arc;

use tracing::warn;

use vita_store::{
    AttemptStore, ChallengeStore, CredentialStore, ReferenceImageStore, ReviewStore, StoreError,
    SubjectStore,
};
use vita_types::{
    AttemptOutcome, CaseId, CredentialId, Modality, OfficerId, ReviewCase, ReviewDecision,
    SubjectId, Timestamp, VerificationMethod, VerificationParams,
};

use crate::authentication::AuthenticationCeremony;
use crate::error::VerificationError;
use crate::outcomes::OutcomeRecorder;
use crate::registration::RegistrationCeremony;
use crate::review::ReviewWorkflow;
use crate::similarity::{Comparison, FaceOutcome, SimilarityComparer};
use crate::wire::{
    AssertionResponse, AuthenticationOptions, EnrollmentResponse, RegistrationOptions,
};

pub struct VerificationService {
    challenges: Arc<dyn ChallengeStore>,
    credentials: Arc<dyn CredentialStore>,
    attempts: Arc<dyn AttemptStore>,
    reviews: Arc<dyn ReviewStore>,
    subjects: Arc<dyn SubjectStore>,
    references: Arc<dyn ReferenceImageStore>,
    comparer: Arc<dyn SimilarityComparer>,
    params: VerificationParams,
}

impl VerificationService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        challenges: Arc<dyn ChallengeStore>,
        credentials: Arc<dyn CredentialStore>,
        attempts: Arc<dyn AttemptStore>,
        reviews: Arc<dyn ReviewStore>,
        subjects: Arc<dyn SubjectStore>,
        references: Arc<dyn ReferenceImageStore>,
        comparer: Arc<dyn SimilarityComparer>,
        params: VerificationParams,
    ) -> Self {
        Self {
            challenges,
            credentials,
            attempts,
            reviews,
            subjects,
            references,
            comparer,
            params,
        }
    }

    pub fn params(&self) -> &VerificationParams {
        &self.params
    }

    fn registration(&self) -> RegistrationCeremony<'_> {
        RegistrationCeremony {
            challenges: &*self.challenges,
            credentials: &*self.credentials,
            params: &self.params,
        }
    }

    fn authentication(&self) -> AuthenticationCeremony<'_> {
        AuthenticationCeremony {
            challenges: &*self.challenges,
            credentials: &*self.credentials,
            params: &self.params,
        }
    }

    fn recorder(&self) -> OutcomeRecorder<'_> {
        OutcomeRecorder {
            attempts: &*self.attempts,
            subjects: &*self.subjects,
            reviews: &*self.reviews,
            params: &self.params,
        }
    }

    /// Resolve the subject record behind an authenticated identity. An
    /// identity with no beneficiary record cannot start ceremonies.
    fn subject_record(
        &self,
        subject: &SubjectId,
    ) -> Result<vita_types::SubjectRecord, VerificationError> {
        match self.subjects.get(subject) {
            Ok(record) => Ok(record),
            Err(StoreError::NotFound(_)) => Err(VerificationError::Unauthorized),
            Err(e) => Err(e.into()),
        }
    }

    // ── Registration ─────────────────────────────────────────────────────

    pub fn registration_options(
        &self,
        subject: &SubjectId,
        modality: Modality,
        now: Timestamp,
    ) -> Result<RegistrationOptions, VerificationError> {
        let record = self.subject_record(subject)?;
        self.registration()
            .issue_options(subject, &record.display_name, modality, now)
    }

    pub fn register(
        &self,
        subject: &SubjectId,
        modality: Modality,
        response: &EnrollmentResponse,
        now: Timestamp,
    ) -> Result<CredentialId, VerificationError> {
        let credential = self.registration().verify(subject, modality, response, now)?;
        Ok(credential.credential_id)
    }

    // ── Authentication ───────────────────────────────────────────────────

    pub fn authentication_options(
        &self,
        subject: &SubjectId,
        modality: Modality,
        now: Timestamp,
    ) -> Result<AuthenticationOptions, VerificationError> {
        self.subject_record(subject)?;
        self.authentication().issue_options(subject, modality, now)
    }

    /// Finish an authentication ceremony and apply its outcome.
    ///
    /// On success returns the new next-due date. Protocol rejections
    /// (`VerificationFailed`, `PinNotAllowed`, `ReplayDetected`) open a
    /// review case and append a FAILED ledger row before the error is
    /// returned; they are never downgraded to a soft outcome.
    /// `ChallengeExpired` and `NoCredentials` are recoverable timing/setup
    /// errors and do not escalate.
    pub fn authenticate(
        &self,
        subject: &SubjectId,
        modality: Modality,
        response: &AssertionResponse,
        now: Timestamp,
    ) -> Result<Timestamp, VerificationError> {
        match self.authentication().verify(subject, modality, response, now) {
            Ok(_credential) => self.recorder().record_success(
                subject,
                VerificationMethod::CredentialKey,
                Some(modality),
                now,
            ),
            Err(e) => {
                if matches!(
                    e,
                    VerificationError::VerificationFailed(_)
                        | VerificationError::PinNotAllowed
                        | VerificationError::ReplayDetected { .. }
                ) {
                    warn!(%subject, %modality, error = %e, "authentication rejected, escalating");
                    if let Err(esc) = self.recorder().escalate(
                        subject,
                        VerificationMethod::CredentialKey,
                        Some(modality),
                        AttemptOutcome::Failed,
                        None,
                        now,
                    ) {
                        warn!(%subject, "escalation after rejection failed: {esc}");
                    }
                }
                Err(e)
            }
        }
    }

    // ── Face similarity ──────────────────────────────────────────────────

    /// Compare a freshly captured image against the subject's stored
    /// reference and apply the threshold policy.
    ///
    /// Low scores and undetected faces are handled outcomes, not errors:
    /// they open a review case and resolve to [`FaceOutcome::Escalated`].
    pub fn verify_face(
        &self,
        subject: &SubjectId,
        probe: &[u8],
        artifact_ref: Option<String>,
        now: Timestamp,
    ) -> Result<FaceOutcome, VerificationError> {
        self.subject_record(subject)?;

        let reference = match self.references.get_reference(subject) {
            Ok(bytes) => bytes,
            Err(StoreError::NotFound(_)) => {
                // Nothing to compare against; an officer has to look.
                warn!(%subject, "no reference image on file, escalating");
                let case = self.recorder().escalate(
                    subject,
                    VerificationMethod::FaceSimilarity,
                    None,
                    AttemptOutcome::PendingReview,
                    artifact_ref,
                    now,
                )?;
                return Ok(FaceOutcome::Escalated { score: None, case });
            }
            Err(e) => return Err(e.into()),
        };

        match self.comparer.compare(&reference, probe)? {
            Comparison::Score(score) if score >= self.params.similarity_threshold => {
                let next_due = self.recorder().record_success(
                    subject,
                    VerificationMethod::FaceSimilarity,
                    None,
                    now,
                )?;
                Ok(FaceOutcome::Accepted { score, next_due })
            }
            Comparison::Score(score) => {
                let case = self.recorder().escalate(
                    subject,
                    VerificationMethod::FaceSimilarity,
                    None,
                    AttemptOutcome::PendingReview,
                    artifact_ref,
                    now,
                )?;
                Ok(FaceOutcome::Escalated {
                    score: Some(score),
                    case,
                })
            }
            Comparison::NoFaceDetected => {
                let case = self.recorder().escalate(
                    subject,
                    VerificationMethod::FaceSimilarity,
                    None,
                    AttemptOutcome::PendingReview,
                    artifact_ref,
                    now,
                )?;
                Ok(FaceOutcome::Escalated { score: None, case })
            }
        }
    }

    // ── Review ───────────────────────────────────────────────────────────

    pub fn decide_review(
        &self,
        case_id: &CaseId,
        decision: ReviewDecision,
        officer: &OfficerId,
        now: Timestamp,
    ) -> Result<ReviewCase, VerificationError> {
        let workflow = ReviewWorkflow {
            reviews: &*self.reviews,
            attempts: &*self.attempts,
            subjects: &*self.subjects,
            params: &self.params,
        };
        workflow.decide(case_id, decision, officer, now)
    }

    pub fn pending_reviews(&self) -> Result<Vec<ReviewCase>, VerificationError> {
        Ok(self.reviews.list_pending()?)
    }

    /// A subject's verification history, oldest first.
    pub fn attempts(
        &self,
        subject: &SubjectId,
    ) -> Result<Vec<vita_types::VerificationAttempt>, VerificationError> {
        Ok(self.attempts.list(subject)?)
    }
}
