//! Ceremony challenge keys.
//!
//! A ceremony spans two stateless requests; the only continuity between
//! them is a single-use random challenge stored under a `ChallengeKey`.

use crate::error::TypeError;
use crate::modality::Modality;
use crate::subject::SubjectId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which half of the credential lifecycle a ceremony belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CeremonyPurpose {
    Register,
    Authenticate,
}

impl CeremonyPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            CeremonyPurpose::Register => "register",
            CeremonyPurpose::Authenticate => "authenticate",
        }
    }
}

impl FromStr for CeremonyPurpose {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "register" => Ok(CeremonyPurpose::Register),
            "authenticate" => Ok(CeremonyPurpose::Authenticate),
            other => Err(TypeError::UnknownPurpose(other.to_string())),
        }
    }
}

impl fmt::Display for CeremonyPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed key for the challenge store.
///
/// Encodes to `{subjectId}_{modality}_{purpose}` at the storage boundary;
/// callers never concatenate strings themselves.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChallengeKey {
    pub subject: SubjectId,
    pub modality: Modality,
    pub purpose: CeremonyPurpose,
}

impl ChallengeKey {
    pub fn new(subject: SubjectId, modality: Modality, purpose: CeremonyPurpose) -> Self {
        Self {
            subject,
            modality,
            purpose,
        }
    }

    /// The storage-layer encoding of this key.
    pub fn storage_key(&self) -> String {
        format!("{}_{}_{}", self.subject, self.modality, self.purpose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_key_format() {
        let key = ChallengeKey::new(
            SubjectId::new("subj-42"),
            Modality::FaceKey,
            CeremonyPurpose::Authenticate,
        );
        assert_eq!(key.storage_key(), "subj-42_FACE_KEY_authenticate");
    }

    #[test]
    fn purposes_yield_distinct_keys() {
        let register = ChallengeKey::new(
            SubjectId::new("s"),
            Modality::FaceKey,
            CeremonyPurpose::Register,
        );
        let authenticate = ChallengeKey::new(
            SubjectId::new("s"),
            Modality::FaceKey,
            CeremonyPurpose::Authenticate,
        );
        assert_ne!(register.storage_key(), authenticate.storage_key());
    }
}
