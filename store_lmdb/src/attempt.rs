//! LMDB implementation of AttemptStore.
//!
//! Rows use composite keys `subject NUL seq_be` where `seq` is a per-subject
//! counter kept in its own database, bumped inside the same write
//! transaction as the append. Listing a subject's history is a prefix
//! range-scan in insertion order.

use std::ops::Bound;
use std::sync::Arc;

use heed::types::{Bytes, Str};
use heed::{Database, Env};

use vita_store::{AttemptStore, StoreError};
use vita_types::{SubjectId, VerificationAttempt};

use crate::{increment_prefix, LmdbError};

pub struct LmdbAttemptStore {
    pub(crate) env: Arc<Env>,
    pub(crate) rows: Database<Bytes, Bytes>,
    pub(crate) seq: Database<Str, Bytes>,
}

fn row_prefix(subject: &SubjectId) -> Vec<u8> {
    let mut prefix = subject.as_str().as_bytes().to_vec();
    prefix.push(0);
    prefix
}

impl AttemptStore for LmdbAttemptStore {
    fn append(&self, attempt: &VerificationAttempt) -> Result<(), StoreError> {
        let bytes = bincode::serialize(attempt).map_err(LmdbError::from)?;
        let subject_key = attempt.subject.as_str();

        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let next = match self.seq.get(&wtxn, subject_key).map_err(LmdbError::from)? {
            Some(raw) => {
                let arr: [u8; 8] = raw.try_into().map_err(|_| {
                    StoreError::Corruption(format!("attempt sequence for {subject_key}"))
                })?;
                u64::from_be_bytes(arr) + 1
            }
            None => 0,
        };

        let mut key = row_prefix(&attempt.subject);
        key.extend_from_slice(&next.to_be_bytes());
        self.rows
            .put(&mut wtxn, &key, &bytes)
            .map_err(LmdbError::from)?;
        self.seq
            .put(&mut wtxn, subject_key, &next.to_be_bytes())
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn list(&self, subject: &SubjectId) -> Result<Vec<VerificationAttempt>, StoreError> {
        let prefix = row_prefix(subject);
        let mut upper = prefix.clone();
        increment_prefix(&mut upper);

        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let bounds = (
            Bound::Included(prefix.as_slice()),
            Bound::Excluded(upper.as_slice()),
        );
        let iter = self.rows.range(&rtxn, &bounds).map_err(LmdbError::from)?;
        let mut results = Vec::new();
        for entry in iter {
            let (_key, val) = entry.map_err(LmdbError::from)?;
            let attempt: VerificationAttempt = bincode::deserialize(val)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            results.push(attempt);
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LmdbEnvironment;
    use vita_types::{AttemptOutcome, Timestamp, VerificationMethod};

    fn attempt(subject: &str, at: u64, outcome: AttemptOutcome) -> VerificationAttempt {
        VerificationAttempt {
            subject: SubjectId::new(subject),
            method: VerificationMethod::CredentialKey,
            modality: None,
            outcome,
            at: Timestamp::new(at),
            next_due: None,
        }
    }

    #[test]
    fn appends_preserve_order_per_subject() {
        let dir = tempfile::tempdir().unwrap();
        let env = LmdbEnvironment::open(dir.path(), 10 * 1024 * 1024).unwrap();
        let store = env.attempts();

        store.append(&attempt("s1", 1, AttemptOutcome::Failed)).unwrap();
        store.append(&attempt("s2", 2, AttemptOutcome::Success)).unwrap();
        store.append(&attempt("s1", 3, AttemptOutcome::Success)).unwrap();

        let rows = store.list(&SubjectId::new("s1")).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].at, Timestamp::new(1));
        assert_eq!(rows[1].at, Timestamp::new(3));
        assert_eq!(store.list(&SubjectId::new("s2")).unwrap().len(), 1);
        assert!(store.list(&SubjectId::new("s3")).unwrap().is_empty());
    }
}
