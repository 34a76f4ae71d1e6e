//! Subject-record access.
//!
//! Subject records are owned by the broader registration system; this
//! trait is the narrow slice the re-verification core needs: read the
//! record, update standing and next-due.

use crate::StoreError;
use vita_types::{Standing, SubjectId, SubjectRecord, Timestamp};

pub trait SubjectStore: Send + Sync {
    fn get(&self, subject: &SubjectId) -> Result<SubjectRecord, StoreError>;

    /// Update a subject's standing and, where supplied, next-due date.
    fn set_standing(
        &self,
        subject: &SubjectId,
        standing: Standing,
        next_due: Option<Timestamp>,
    ) -> Result<(), StoreError>;
}
