//! Identity re-verification core.
//!
//! Periodic proof-of-life checks for beneficiaries run through one of two
//! automated paths:
//! 1. **Credential ceremony**: a two-phase challenge/response against a
//!    platform-bound public-key credential enrolled per biometric modality.
//!    Presence-only assertions are rejected; the authenticator must prove
//!    it actually verified the user.
//! 2. **Face similarity**: a freshly captured image compared against the
//!    stored reference image by an external collaborator, gated by a score
//!    threshold.
//!
//! Both paths feed the append-only verification ledger and the subject's
//! standing. Rejections and inconclusive matches escalate to a human
//! review case instead of dead-ending the subject.
//!
//! All state between the two phases of a ceremony lives in the
//! `ChallengeStore`; the handlers themselves are stateless and take the
//! current time as an argument.

pub mod authentication;
pub mod error;
pub mod outcomes;
pub mod registration;
pub mod review;
pub mod service;
pub mod similarity;
pub mod wire;

pub use authentication::AuthenticationCeremony;
pub use error::VerificationError;
pub use outcomes::OutcomeRecorder;
pub use registration::RegistrationCeremony;
pub use review::ReviewWorkflow;
pub use service::VerificationService;
pub use similarity::{Comparison, FaceOutcome, SimilarityComparer, SimilarityError};
pub use wire::{
    AssertionResponse, AuthenticationOptions, AuthenticatorAttachment, AuthenticatorData,
    ClientData, EnrollmentResponse, RegistrationOptions, SignatureAlgorithm,
};
