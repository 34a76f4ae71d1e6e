//! Enrolled public-key credentials.

use crate::error::TypeError;
use crate::keys::PublicKey;
use crate::modality::Modality;
use crate::subject::SubjectId;
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, stable identifier the authenticator assigned to a credential.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CredentialId(Vec<u8>);

impl CredentialId {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        hex::decode(s)
            .map(Self)
            .map_err(|e| TypeError::InvalidHex(e.to_string()))
    }
}

impl fmt::Display for CredentialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// How the authenticator that holds a credential can be reached.
///
/// Hints only; never used for policy decisions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transport {
    Internal,
    Hybrid,
    Usb,
    Nfc,
    Ble,
}

/// One enrolled biometric public-key credential.
///
/// At most one exists per (subject, modality); the storage layer enforces
/// this at write time. Only `counter` is ever mutated after enrollment,
/// and only through the store's conditional bump.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Credential {
    pub subject: SubjectId,
    pub modality: Modality,
    pub credential_id: CredentialId,
    pub public_key: PublicKey,
    /// Monotonic signature counter reported by the authenticator.
    pub counter: u64,
    pub transports: Vec<Transport>,
    pub enrolled_at: Timestamp,
}
