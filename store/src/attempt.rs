//! Append-only verification ledger storage.

use crate::StoreError;
use vita_types::{SubjectId, VerificationAttempt};

/// The verification ledger. Rows are appended and never mutated.
pub trait AttemptStore: Send + Sync {
    /// Append one attempt row.
    fn append(&self, attempt: &VerificationAttempt) -> Result<(), StoreError>;

    /// All recorded attempts for a subject, oldest first.
    fn list(&self, subject: &SubjectId) -> Result<Vec<VerificationAttempt>, StoreError>;
}
