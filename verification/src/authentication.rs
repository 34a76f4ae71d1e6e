//! Authentication ceremony: prove possession and use of an enrolled
//! credential.
//!
//! Per attempt: `NoChallenge -> ChallengeIssued -> (Accepted | Rejected |
//! Expired)`. After the signature itself, two policy checks run in a fixed
//! order: user verification first, then the anti-replay counter. A valid
//! signature is not enough on its own.

use tracing::{debug, warn};

use vita_store::{ChallengeStore, CredentialStore, StoreError};
use vita_types::{
    CeremonyPurpose, ChallengeKey, Credential, Modality, SubjectId, Timestamp,
    VerificationParams,
};

use crate::error::VerificationError;
use crate::wire::{signature_base, AssertionResponse, AuthenticationOptions};

pub struct AuthenticationCeremony<'a> {
    pub challenges: &'a dyn ChallengeStore,
    pub credentials: &'a dyn CredentialStore,
    pub params: &'a VerificationParams,
}

impl<'a> AuthenticationCeremony<'a> {
    /// Issue authentication options scoped to the subject's own enrolled
    /// credentials.
    pub fn issue_options(
        &self,
        subject: &SubjectId,
        modality: Modality,
        now: Timestamp,
    ) -> Result<AuthenticationOptions, VerificationError> {
        let allowed = self.credentials.allowed_ids(subject, modality)?;
        if allowed.is_empty() {
            return Err(VerificationError::NoCredentials {
                subject: subject.clone(),
                modality,
            });
        }

        let challenge = vita_crypto::random_challenge();
        let key = ChallengeKey::new(subject.clone(), modality, CeremonyPurpose::Authenticate);
        self.challenges
            .put(&key, &challenge, self.params.challenge_ttl_secs, now)?;

        debug!(%subject, %modality, "issued authentication challenge");
        Ok(AuthenticationOptions {
            challenge: challenge.to_vec(),
            rp_id: self.params.rp_id.clone(),
            allowed_credential_ids: allowed,
            require_user_verification: true,
        })
    }

    /// Verify a signed assertion.
    ///
    /// On success the stored counter has already been advanced via the
    /// store's compare-and-set; the returned credential carries the new
    /// counter value.
    pub fn verify(
        &self,
        subject: &SubjectId,
        modality: Modality,
        response: &AssertionResponse,
        now: Timestamp,
    ) -> Result<Credential, VerificationError> {
        let key = ChallengeKey::new(subject.clone(), modality, CeremonyPurpose::Authenticate);
        let challenge = self.challenges.consume(&key, now).map_err(|e| match e {
            StoreError::NotFound(_) => VerificationError::ChallengeExpired,
            other => other.into(),
        })?;

        let mut credential = match self.credentials.get_by_id(&response.credential_id) {
            Ok(c) => c,
            Err(StoreError::NotFound(_)) => {
                warn!(%subject, %modality, "assertion names an unknown credential");
                return Err(VerificationError::VerificationFailed(
                    "unknown credential".to_string(),
                ));
            }
            Err(e) => return Err(e.into()),
        };

        // The credential must be the subject's own, for this modality.
        if credential.subject != *subject || credential.modality != modality {
            warn!(%subject, %modality, "assertion uses a foreign credential");
            return Err(VerificationError::VerificationFailed(
                "credential does not belong to this ceremony".to_string(),
            ));
        }

        if response.client_data.purpose != CeremonyPurpose::Authenticate {
            return Err(VerificationError::VerificationFailed(
                "client data purpose is not authenticate".to_string(),
            ));
        }
        if response.client_data.challenge != challenge {
            return Err(VerificationError::VerificationFailed(
                "challenge mismatch".to_string(),
            ));
        }
        if response.client_data.origin != self.params.origin {
            return Err(VerificationError::VerificationFailed(format!(
                "unexpected origin {}",
                response.client_data.origin
            )));
        }
        if !response.authenticator_data.binds_rp(&self.params.rp_id) {
            return Err(VerificationError::VerificationFailed(
                "relying-party hash mismatch".to_string(),
            ));
        }

        let base = signature_base(&response.authenticator_data, &response.client_data);
        if !vita_crypto::verify_signature(&base, &response.signature, &credential.public_key) {
            warn!(%subject, %modality, "assertion signature invalid");
            return Err(VerificationError::VerificationFailed(
                "invalid assertion signature".to_string(),
            ));
        }

        // Post-check 1: user verification, regardless of signature validity.
        if !response.authenticator_data.user_verified() {
            return Err(VerificationError::PinNotAllowed);
        }

        // Post-check 2: the counter must strictly advance.
        let reported = response.authenticator_data.counter;
        if reported <= credential.counter {
            return Err(VerificationError::ReplayDetected {
                reported,
                stored: credential.counter,
            });
        }

        // The store re-checks under its write lock; losing that race is
        // also a replay.
        self.credentials
            .bump_counter(&response.credential_id, reported)
            .map_err(|e| match e {
                StoreError::StaleCounter {
                    reported, stored, ..
                } => VerificationError::ReplayDetected { reported, stored },
                other => other.into(),
            })?;

        credential.counter = reported;
        debug!(%subject, %modality, counter = reported, "assertion accepted");
        Ok(credential)
    }
}
