//! Fundamental types for the Vita identity re-verification protocol.
//!
//! Everything here is plain data: subjects, enrolled credentials, ceremony
//! challenge keys, the append-only verification ledger rows, and review
//! cases. Behaviour lives in `vita-verification`; storage lives behind the
//! traits in `vita-store`.

pub mod attempt;
pub mod challenge;
pub mod credential;
pub mod error;
pub mod keys;
pub mod modality;
pub mod params;
pub mod review;
pub mod subject;
pub mod time;

pub use attempt::{AttemptOutcome, VerificationAttempt, VerificationMethod};
pub use challenge::{CeremonyPurpose, ChallengeKey};
pub use credential::{Credential, CredentialId, Transport};
pub use error::TypeError;
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
pub use modality::Modality;
pub use params::VerificationParams;
pub use review::{CaseId, OfficerId, ReviewCase, ReviewDecision, ReviewStatus};
pub use subject::{Standing, SubjectId, SubjectRecord};
pub use time::Timestamp;
