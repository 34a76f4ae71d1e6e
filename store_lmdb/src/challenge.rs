//! LMDB implementation of ChallengeStore.
//!
//! Values carry their absolute expiry alongside the challenge bytes so
//! `consume` can reject stale entries without a background sweeper.

use std::sync::Arc;

use heed::types::{Bytes, Str};
use heed::{Database, Env};
use serde::{Deserialize, Serialize};

use vita_store::{ChallengeStore, StoreError};
use vita_types::{ChallengeKey, Timestamp};

use crate::LmdbError;

#[derive(Serialize, Deserialize)]
struct StoredChallenge {
    value: Vec<u8>,
    expires_at: u64,
}

pub struct LmdbChallengeStore {
    pub(crate) env: Arc<Env>,
    pub(crate) db: Database<Str, Bytes>,
}

impl ChallengeStore for LmdbChallengeStore {
    fn put(
        &self,
        key: &ChallengeKey,
        value: &[u8],
        ttl_secs: u64,
        now: Timestamp,
    ) -> Result<(), StoreError> {
        let stored = StoredChallenge {
            value: value.to_vec(),
            expires_at: now.plus(ttl_secs).as_secs(),
        };
        let bytes = bincode::serialize(&stored).map_err(LmdbError::from)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.db
            .put(&mut wtxn, &key.storage_key(), &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn consume(&self, key: &ChallengeKey, now: Timestamp) -> Result<Vec<u8>, StoreError> {
        let storage_key = key.storage_key();

        // Get and delete under the same write transaction; LMDB serialises
        // writers, so two concurrent consumers cannot both see the value.
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let raw = self
            .db
            .get(&wtxn, &storage_key)
            .map_err(LmdbError::from)?
            .map(<[u8]>::to_vec);

        let Some(raw) = raw else {
            return Err(StoreError::NotFound(storage_key));
        };

        self.db
            .delete(&mut wtxn, &storage_key)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;

        let stored: StoredChallenge =
            bincode::deserialize(&raw).map_err(LmdbError::from)?;
        if now.as_secs() >= stored.expires_at {
            // Expired entries are indistinguishable from absent ones.
            return Err(StoreError::NotFound(storage_key));
        }
        Ok(stored.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LmdbEnvironment;
    use vita_types::{CeremonyPurpose, Modality, SubjectId};

    fn test_env() -> (tempfile::TempDir, LmdbEnvironment) {
        let dir = tempfile::tempdir().unwrap();
        let env = LmdbEnvironment::open(dir.path(), 10 * 1024 * 1024).unwrap();
        (dir, env)
    }

    fn key(subject: &str) -> ChallengeKey {
        ChallengeKey::new(
            SubjectId::new(subject),
            Modality::FaceKey,
            CeremonyPurpose::Authenticate,
        )
    }

    #[test]
    fn consume_returns_value_once() {
        let (_dir, env) = test_env();
        let store = env.challenges();
        let now = Timestamp::new(1000);

        store.put(&key("s1"), b"challenge-bytes", 300, now).unwrap();
        assert_eq!(store.consume(&key("s1"), now).unwrap(), b"challenge-bytes");
        assert!(matches!(
            store.consume(&key("s1"), now),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn expired_challenge_is_not_found() {
        let (_dir, env) = test_env();
        let store = env.challenges();

        store
            .put(&key("s1"), b"bytes", 300, Timestamp::new(1000))
            .unwrap();
        assert!(matches!(
            store.consume(&key("s1"), Timestamp::new(1300)),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn expired_consume_still_deletes() {
        let (_dir, env) = test_env();
        let store = env.challenges();

        store
            .put(&key("s1"), b"bytes", 300, Timestamp::new(1000))
            .unwrap();
        let _ = store.consume(&key("s1"), Timestamp::new(2000));
        // A later in-window consume must not resurrect the entry.
        assert!(store.consume(&key("s1"), Timestamp::new(1100)).is_err());
    }

    #[test]
    fn put_overwrites_existing_value() {
        let (_dir, env) = test_env();
        let store = env.challenges();
        let now = Timestamp::new(1000);

        store.put(&key("s1"), b"first", 300, now).unwrap();
        store.put(&key("s1"), b"second", 300, now).unwrap();
        assert_eq!(store.consume(&key("s1"), now).unwrap(), b"second");
    }
}
