//! Ceremony wire types.
//!
//! The two-phase ceremony exchanges exactly four payload shapes: options
//! and a signed response, for each of registration and authentication.
//! Every field is a closed type; there are no optional grab-bag maps to
//! cast out of.
//!
//! The signed material follows the passkey layout: the authenticator signs
//! `authenticator_data_bytes || blake2b256(client_data)`, where the client
//! data binds the challenge, the origin and the ceremony purpose, and the
//! authenticator data binds the relying party, the verification flags and
//! the signature counter.

use serde::{Deserialize, Serialize};
use vita_crypto::{blake2b_256, blake2b_256_multi};
use vita_types::{
    CeremonyPurpose, CredentialId, PublicKey, Signature, SubjectId, Transport, TypeError,
};

/// Authenticator flag: a user was present (e.g. tapped the device).
pub const FLAG_USER_PRESENT: u8 = 1 << 0;
/// Authenticator flag: the user was actively verified (biometric or PIN).
pub const FLAG_USER_VERIFIED: u8 = 1 << 2;

/// Signature algorithms a ceremony accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignatureAlgorithm {
    Ed25519,
}

impl SignatureAlgorithm {
    /// COSE algorithm identifier (EdDSA = -8).
    pub fn cose_id(&self) -> i32 {
        match self {
            SignatureAlgorithm::Ed25519 => -8,
        }
    }
}

/// Where the credential must live. Only platform-bound authenticators are
/// accepted for enrollment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthenticatorAttachment {
    Platform,
}

/// The client-side half of the signed material.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientData {
    pub purpose: CeremonyPurpose,
    pub challenge: Vec<u8>,
    pub origin: String,
}

impl ClientData {
    /// Canonical hash over the client data fields.
    ///
    /// Hashed field-by-field in a fixed order so both sides agree without
    /// a canonical-JSON dependency.
    pub fn hash(&self) -> [u8; 32] {
        blake2b_256_multi(&[
            self.purpose.as_str().as_bytes(),
            &self.challenge,
            self.origin.as_bytes(),
        ])
    }
}

/// The authenticator-side half of the signed material.
///
/// Fixed 41-byte encoding: `rp_id_hash (32) || flags (1) || counter (8,
/// big-endian)`. The encoding is canonical; the signature covers these
/// exact bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatorData {
    pub rp_id_hash: [u8; 32],
    pub flags: u8,
    pub counter: u64,
}

impl AuthenticatorData {
    pub const LEN: usize = 41;

    pub fn new(rp_id: &str, flags: u8, counter: u64) -> Self {
        Self {
            rp_id_hash: blake2b_256(rp_id.as_bytes()),
            flags,
            counter,
        }
    }

    pub fn to_bytes(&self) -> [u8; Self::LEN] {
        let mut out = [0u8; Self::LEN];
        out[..32].copy_from_slice(&self.rp_id_hash);
        out[32] = self.flags;
        out[33..].copy_from_slice(&self.counter.to_be_bytes());
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TypeError> {
        if bytes.len() != Self::LEN {
            return Err(TypeError::InvalidLength {
                expected: Self::LEN,
                got: bytes.len(),
            });
        }
        let mut rp_id_hash = [0u8; 32];
        rp_id_hash.copy_from_slice(&bytes[..32]);
        let mut counter = [0u8; 8];
        counter.copy_from_slice(&bytes[33..]);
        Ok(Self {
            rp_id_hash,
            flags: bytes[32],
            counter: u64::from_be_bytes(counter),
        })
    }

    pub fn user_present(&self) -> bool {
        self.flags & FLAG_USER_PRESENT != 0
    }

    pub fn user_verified(&self) -> bool {
        self.flags & FLAG_USER_VERIFIED != 0
    }

    /// Whether the hash matches the given relying-party identifier.
    pub fn binds_rp(&self, rp_id: &str) -> bool {
        self.rp_id_hash == blake2b_256(rp_id.as_bytes())
    }
}

/// The exact bytes an authenticator signs for a ceremony response.
pub fn signature_base(auth_data: &AuthenticatorData, client_data: &ClientData) -> Vec<u8> {
    let mut base = auth_data.to_bytes().to_vec();
    base.extend_from_slice(&client_data.hash());
    base
}

/// Parameters handed to the client to start an enrollment ceremony.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegistrationOptions {
    pub challenge: Vec<u8>,
    pub rp_id: String,
    pub subject: SubjectId,
    pub display_name: String,
    pub allowed_algorithms: Vec<SignatureAlgorithm>,
    pub require_user_verification: bool,
    pub attachment: AuthenticatorAttachment,
}

/// The signed enrollment response. Self-attested: the signature is made
/// with the freshly created credential key itself.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnrollmentResponse {
    pub credential_id: CredentialId,
    pub public_key: PublicKey,
    pub authenticator_data: AuthenticatorData,
    pub client_data: ClientData,
    pub signature: Signature,
    pub transports: Vec<Transport>,
}

/// Parameters handed to the client to start an authentication ceremony,
/// scoped to the subject's own enrolled credentials.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuthenticationOptions {
    pub challenge: Vec<u8>,
    pub rp_id: String,
    pub allowed_credential_ids: Vec<CredentialId>,
    pub require_user_verification: bool,
}

/// The signed assertion submitted to finish an authentication ceremony.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AssertionResponse {
    pub credential_id: CredentialId,
    pub authenticator_data: AuthenticatorData,
    pub client_data: ClientData,
    pub signature: Signature,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authenticator_data_round_trips() {
        let data = AuthenticatorData::new("vita.example", FLAG_USER_PRESENT | FLAG_USER_VERIFIED, 42);
        let decoded = AuthenticatorData::from_bytes(&data.to_bytes()).unwrap();
        assert_eq!(decoded, data);
        assert!(decoded.user_present());
        assert!(decoded.user_verified());
        assert_eq!(decoded.counter, 42);
    }

    #[test]
    fn from_bytes_rejects_wrong_length() {
        assert!(AuthenticatorData::from_bytes(&[0u8; 40]).is_err());
        assert!(AuthenticatorData::from_bytes(&[0u8; 42]).is_err());
    }

    #[test]
    fn presence_only_flags() {
        let data = AuthenticatorData::new("vita.example", FLAG_USER_PRESENT, 1);
        assert!(data.user_present());
        assert!(!data.user_verified());
    }

    #[test]
    fn rp_binding() {
        let data = AuthenticatorData::new("vita.example", 0, 0);
        assert!(data.binds_rp("vita.example"));
        assert!(!data.binds_rp("evil.example"));
    }

    #[test]
    fn client_data_hash_depends_on_every_field() {
        let base = ClientData {
            purpose: CeremonyPurpose::Authenticate,
            challenge: vec![1, 2, 3],
            origin: "https://vita.example".to_string(),
        };
        let mut other = base.clone();
        other.challenge = vec![1, 2, 4];
        assert_ne!(base.hash(), other.hash());

        let mut other = base.clone();
        other.origin = "https://evil.example".to_string();
        assert_ne!(base.hash(), other.hash());

        let mut other = base.clone();
        other.purpose = CeremonyPurpose::Register;
        assert_ne!(base.hash(), other.hash());
    }
}
