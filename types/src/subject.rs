//! Subject identity and standing.
//!
//! The subject record itself is owned by the broader registration system;
//! this core only reads the record and updates `standing`/`next_due` as a
//! side effect of verification outcomes.

use crate::time::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, stable identifier of a beneficiary.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubjectId(String);

impl SubjectId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SubjectId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A subject's current verification standing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Standing {
    /// Never verified, or verification in progress.
    Pending,
    /// Verified and in good standing until `next_due`.
    Verified,
    /// An officer rejected the subject's last review case.
    Flagged,
}

impl Standing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Standing::Pending => "PENDING",
            Standing::Verified => "VERIFIED",
            Standing::Flagged => "FLAGGED",
        }
    }
}

/// The slice of the subject record this core reads and writes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubjectRecord {
    pub id: SubjectId,
    pub display_name: String,
    pub standing: Standing,
    /// When the subject must re-verify. `None` until first verified.
    pub next_due: Option<Timestamp>,
}
