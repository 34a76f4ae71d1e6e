//! Human-adjudication review cases.

use crate::error::TypeError;
use crate::subject::SubjectId;
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a review case (16 random bytes, hex-encoded).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaseId(String);

impl CaseId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of the officer who decided a case.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OfficerId(String);

impl OfficerId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OfficerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::Pending => "PENDING",
            ReviewStatus::Approved => "APPROVED",
            ReviewStatus::Rejected => "REJECTED",
        }
    }
}

/// An officer's verdict on a pending case.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewDecision {
    Approve,
    Reject,
}

impl ReviewDecision {
    /// The status a pending case transitions to under this decision.
    pub fn resulting_status(&self) -> ReviewStatus {
        match self {
            ReviewDecision::Approve => ReviewStatus::Approved,
            ReviewDecision::Reject => ReviewStatus::Rejected,
        }
    }
}

impl FromStr for ReviewDecision {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "APPROVE" => Ok(ReviewDecision::Approve),
            "REJECT" => Ok(ReviewDecision::Reject),
            other => Err(TypeError::UnknownDecision(other.to_string())),
        }
    }
}

/// A pending (or decided) human-adjudication record.
///
/// Mutated exactly once, by an officer decision; the storage layer
/// enforces the PENDING precondition.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReviewCase {
    pub id: CaseId,
    pub subject: SubjectId,
    /// Pointer to the captured artifact (e.g. an image), where one exists.
    pub artifact_ref: Option<String>,
    pub status: ReviewStatus,
    pub opened_at: Timestamp,
    pub decided_at: Option<Timestamp>,
    pub decided_by: Option<OfficerId>,
}

impl ReviewCase {
    pub fn open(
        id: CaseId,
        subject: SubjectId,
        artifact_ref: Option<String>,
        now: Timestamp,
    ) -> Self {
        Self {
            id,
            subject,
            artifact_ref,
            status: ReviewStatus::Pending,
            opened_at: now,
            decided_at: None,
            decided_by: None,
        }
    }
}
