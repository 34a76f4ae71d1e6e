//! LMDB implementation of SubjectStore.

use std::sync::Arc;

use heed::types::{Bytes, Str};
use heed::{Database, Env};

use vita_store::{StoreError, SubjectStore};
use vita_types::{Standing, SubjectId, SubjectRecord, Timestamp};

use crate::LmdbError;

pub struct LmdbSubjectStore {
    pub(crate) env: Arc<Env>,
    pub(crate) db: Database<Str, Bytes>,
}

impl LmdbSubjectStore {
    /// Seed a subject record. In production the registration system owns
    /// these rows; this exists for bootstrap and tests.
    pub fn put(&self, record: &SubjectRecord) -> Result<(), StoreError> {
        let bytes = bincode::serialize(record).map_err(LmdbError::from)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.db
            .put(&mut wtxn, record.id.as_str(), &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}

impl SubjectStore for LmdbSubjectStore {
    fn get(&self, subject: &SubjectId) -> Result<SubjectRecord, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let raw = self
            .db
            .get(&rtxn, subject.as_str())
            .map_err(LmdbError::from)?
            .ok_or_else(|| StoreError::NotFound(subject.to_string()))?;
        bincode::deserialize(raw).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn set_standing(
        &self,
        subject: &SubjectId,
        standing: Standing,
        next_due: Option<Timestamp>,
    ) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let raw = self
            .db
            .get(&wtxn, subject.as_str())
            .map_err(LmdbError::from)?
            .ok_or_else(|| StoreError::NotFound(subject.to_string()))?;
        let mut record: SubjectRecord =
            bincode::deserialize(raw).map_err(|e| StoreError::Serialization(e.to_string()))?;

        record.standing = standing;
        if next_due.is_some() {
            record.next_due = next_due;
        }
        let bytes =
            bincode::serialize(&record).map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.db
            .put(&mut wtxn, subject.as_str(), &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}
