//! LMDB implementation of ReviewStore.

use std::sync::Arc;

use heed::types::{Bytes, Str};
use heed::{Database, Env};

use vita_store::{ReviewStore, StoreError};
use vita_types::{CaseId, OfficerId, ReviewCase, ReviewDecision, ReviewStatus, Timestamp};

use crate::LmdbError;

pub struct LmdbReviewStore {
    pub(crate) env: Arc<Env>,
    pub(crate) db: Database<Str, Bytes>,
}

impl ReviewStore for LmdbReviewStore {
    fn create(&self, case: &ReviewCase) -> Result<(), StoreError> {
        let bytes = bincode::serialize(case).map_err(LmdbError::from)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.db
            .put(&mut wtxn, case.id.as_str(), &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn get(&self, case_id: &CaseId) -> Result<ReviewCase, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let raw = self
            .db
            .get(&rtxn, case_id.as_str())
            .map_err(LmdbError::from)?
            .ok_or_else(|| StoreError::NotFound(case_id.to_string()))?;
        bincode::deserialize(raw).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn decide(
        &self,
        case_id: &CaseId,
        decision: ReviewDecision,
        officer: &OfficerId,
        now: Timestamp,
    ) -> Result<ReviewCase, StoreError> {
        // Status check and update share one write transaction; a case is
        // decided exactly once even with two officers racing.
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let raw = self
            .db
            .get(&wtxn, case_id.as_str())
            .map_err(LmdbError::from)?
            .ok_or_else(|| StoreError::NotFound(case_id.to_string()))?;
        let mut case: ReviewCase =
            bincode::deserialize(raw).map_err(|e| StoreError::Serialization(e.to_string()))?;

        if case.status != ReviewStatus::Pending {
            return Err(StoreError::AlreadyDecided(case_id.to_string()));
        }

        case.status = decision.resulting_status();
        case.decided_at = Some(now);
        case.decided_by = Some(officer.clone());
        let bytes =
            bincode::serialize(&case).map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.db
            .put(&mut wtxn, case_id.as_str(), &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(case)
    }

    fn list_pending(&self) -> Result<Vec<ReviewCase>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let iter = self.db.iter(&rtxn).map_err(LmdbError::from)?;
        let mut pending = Vec::new();
        for entry in iter {
            let (_key, val) = entry.map_err(LmdbError::from)?;
            let case: ReviewCase = bincode::deserialize(val)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            if case.status == ReviewStatus::Pending {
                pending.push(case);
            }
        }
        pending.sort_by_key(|c| c.opened_at);
        Ok(pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LmdbEnvironment;
    use vita_types::SubjectId;

    #[test]
    fn decide_is_exactly_once() {
        let dir = tempfile::tempdir().unwrap();
        let env = LmdbEnvironment::open(dir.path(), 10 * 1024 * 1024).unwrap();
        let store = env.reviews();

        let case = ReviewCase::open(
            CaseId::new("case-1"),
            SubjectId::new("s1"),
            Some("img-123".to_string()),
            Timestamp::new(100),
        );
        store.create(&case).unwrap();

        let officer = OfficerId::new("officer-9");
        let decided = store
            .decide(&case.id, ReviewDecision::Approve, &officer, Timestamp::new(200))
            .unwrap();
        assert_eq!(decided.status, ReviewStatus::Approved);
        assert_eq!(decided.decided_by, Some(officer.clone()));

        assert!(matches!(
            store.decide(&case.id, ReviewDecision::Reject, &officer, Timestamp::new(300)),
            Err(StoreError::AlreadyDecided(_))
        ));
        // The first decision stands.
        assert_eq!(store.get(&case.id).unwrap().status, ReviewStatus::Approved);
    }

    #[test]
    fn unknown_case_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let env = LmdbEnvironment::open(dir.path(), 10 * 1024 * 1024).unwrap();
        let store = env.reviews();
        assert!(matches!(
            store.get(&CaseId::new("missing")),
            Err(StoreError::NotFound(_))
        ));
    }
}
