//! Registration ceremony: enroll a new credential for a modality.
//!
//! Per attempt: `NoChallenge -> ChallengeIssued -> (Verified | Rejected |
//! Expired)`. The two phases are independent stateless requests; the only
//! shared state is the challenge.

use tracing::{debug, warn};

use vita_store::{ChallengeStore, CredentialStore, StoreError};
use vita_types::{
    CeremonyPurpose, ChallengeKey, Credential, Modality, SubjectId, Timestamp,
    VerificationParams,
};

use crate::error::VerificationError;
use crate::wire::{
    signature_base, AuthenticatorAttachment, EnrollmentResponse, RegistrationOptions,
    SignatureAlgorithm,
};

pub struct RegistrationCeremony<'a> {
    pub challenges: &'a dyn ChallengeStore,
    pub credentials: &'a dyn CredentialStore,
    pub params: &'a VerificationParams,
}

impl<'a> RegistrationCeremony<'a> {
    /// Issue enrollment options for an already-authenticated subject.
    ///
    /// Rejects with `AlreadyEnrolled` before issuing a challenge, so an
    /// enrolled subject never wastes a ceremony.
    pub fn issue_options(
        &self,
        subject: &SubjectId,
        display_name: &str,
        modality: Modality,
        now: Timestamp,
    ) -> Result<RegistrationOptions, VerificationError> {
        match self.credentials.get(subject, modality) {
            Ok(_) => {
                return Err(VerificationError::AlreadyEnrolled {
                    subject: subject.clone(),
                    modality,
                })
            }
            Err(StoreError::NotFound(_)) => {}
            Err(e) => return Err(e.into()),
        }

        let challenge = vita_crypto::random_challenge();
        let key = ChallengeKey::new(subject.clone(), modality, CeremonyPurpose::Register);
        self.challenges
            .put(&key, &challenge, self.params.challenge_ttl_secs, now)?;

        debug!(%subject, %modality, "issued registration challenge");
        Ok(RegistrationOptions {
            challenge: challenge.to_vec(),
            rp_id: self.params.rp_id.clone(),
            subject: subject.clone(),
            display_name: display_name.to_string(),
            allowed_algorithms: vec![SignatureAlgorithm::Ed25519],
            require_user_verification: true,
            attachment: AuthenticatorAttachment::Platform,
        })
    }

    /// Verify a signed enrollment response and persist the credential.
    ///
    /// Consumes the challenge first; every later rejection leaves no side
    /// effects beyond that consumption.
    pub fn verify(
        &self,
        subject: &SubjectId,
        modality: Modality,
        response: &EnrollmentResponse,
        now: Timestamp,
    ) -> Result<Credential, VerificationError> {
        let key = ChallengeKey::new(subject.clone(), modality, CeremonyPurpose::Register);
        let challenge = self.challenges.consume(&key, now).map_err(|e| match e {
            StoreError::NotFound(_) => VerificationError::ChallengeExpired,
            other => other.into(),
        })?;

        if response.client_data.purpose != CeremonyPurpose::Register {
            return Err(VerificationError::VerificationFailed(
                "client data purpose is not register".to_string(),
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

        // Enrollment policy: the attestation must prove active user
        // verification, not mere presence. The registration surface reports
        // this as a verification failure.
        if !response.authenticator_data.user_verified() {
            warn!(%subject, %modality, "enrollment attestation without user verification");
            return Err(VerificationError::VerificationFailed(
                "attestation made without user verification".to_string(),
            ));
        }

        let base = signature_base(&response.authenticator_data, &response.client_data);
        if !vita_crypto::verify_signature(&base, &response.signature, &response.public_key) {
            warn!(%subject, %modality, "enrollment attestation signature invalid");
            return Err(VerificationError::VerificationFailed(
                "invalid attestation signature".to_string(),
            ));
        }

        let credential = Credential {
            subject: subject.clone(),
            modality,
            credential_id: response.credential_id.clone(),
            public_key: response.public_key.clone(),
            counter: response.authenticator_data.counter,
            transports: response.transports.clone(),
            enrolled_at: now,
        };

        // A concurrent enrollment may have won between the pre-check and
        // here; the store's uniqueness guarantee surfaces it cleanly.
        self.credentials.enroll(&credential).map_err(|e| match e {
            StoreError::Duplicate(_) => VerificationError::AlreadyEnrolled {
                subject: subject.clone(),
                modality,
            },
            other => other.into(),
        })?;

        debug!(%subject, %modality, credential = %credential.credential_id, "credential enrolled");
        Ok(credential)
    }
}
