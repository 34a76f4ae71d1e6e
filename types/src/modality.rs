//! Biometric modality tags.

use crate::error::TypeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The biometric factor backing an enrolled credential.
///
/// Closed set: a subject holds at most one credential per modality.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Modality {
    /// Platform key released by a face check.
    FaceKey,
    /// Platform key released by a fingerprint check.
    FingerprintKey,
}

impl Modality {
    /// Stable tag used in challenge-store keys and storage keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::FaceKey => "FACE_KEY",
            Modality::FingerprintKey => "FINGERPRINT_KEY",
        }
    }

    pub const ALL: [Modality; 2] = [Modality::FaceKey, Modality::FingerprintKey];
}

impl FromStr for Modality {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FACE_KEY" => Ok(Modality::FaceKey),
            "FINGERPRINT_KEY" => Ok(Modality::FingerprintKey),
            other => Err(TypeError::UnknownModality(other.to_string())),
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_str() {
        for m in Modality::ALL {
            assert_eq!(m.as_str().parse::<Modality>().unwrap(), m);
        }
    }

    #[test]
    fn rejects_unknown_tag() {
        assert!("VOICE_KEY".parse::<Modality>().is_err());
    }
}
