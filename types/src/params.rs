//! Protocol parameters for the re-verification core.

use serde::{Deserialize, Serialize};

/// Tunable parameters shared by both ceremony handlers and the face
/// similarity verifier.
///
/// The credential and similarity paths keep deliberately independent
/// re-verification intervals: a hardware-backed key ceremony buys years,
/// a similarity match only months.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VerificationParams {
    /// Relying-party identifier bound into every ceremony (e.g. a domain).
    pub rp_id: String,

    /// Origin the client data of a ceremony response must carry.
    pub origin: String,

    /// Challenge time-to-live in seconds.
    pub challenge_ttl_secs: u64,

    /// Minimum similarity score (0–100) for the face path to pass.
    pub similarity_threshold: u8,

    /// Seconds until re-verification is due after a credential ceremony.
    /// Default: ~3 years.
    pub credential_interval_secs: u64,

    /// Seconds until re-verification is due after a similarity match or an
    /// officer approval. Default: 180 days.
    pub similarity_interval_secs: u64,
}

impl Default for VerificationParams {
    fn default() -> Self {
        Self {
            rp_id: "vita.example".to_string(),
            origin: "https://vita.example".to_string(),
            challenge_ttl_secs: 300,
            similarity_threshold: 80,
            credential_interval_secs: 94_608_000,
            similarity_interval_secs: 15_552_000,
        }
    }
}
