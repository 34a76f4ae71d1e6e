//! LMDB implementation of CredentialStore.
//!
//! Two databases: `credentials` is the primary, keyed by the opaque
//! credential id; `credentials_by_subject` maps `subject NUL modality` to
//! the credential id and carries the at-most-one-per-modality uniqueness.

use std::sync::Arc;

use heed::types::{Bytes, Str};
use heed::{Database, Env};

use vita_store::{CredentialStore, StoreError};
use vita_types::{Credential, CredentialId, Modality, SubjectId};

use crate::LmdbError;

pub struct LmdbCredentialStore {
    pub(crate) env: Arc<Env>,
    pub(crate) by_id: Database<Bytes, Bytes>,
    pub(crate) by_subject: Database<Str, Bytes>,
}

/// Index key `subject NUL modality`. NUL cannot appear in a modality tag,
/// so the encoding is unambiguous for any subject id.
fn index_key(subject: &SubjectId, modality: Modality) -> String {
    format!("{}\u{0}{}", subject.as_str(), modality.as_str())
}

impl CredentialStore for LmdbCredentialStore {
    fn enroll(&self, credential: &Credential) -> Result<(), StoreError> {
        let idx = index_key(&credential.subject, credential.modality);
        let bytes = bincode::serialize(credential).map_err(LmdbError::from)?;

        // Uniqueness check and insert share one write transaction, so two
        // concurrent enrollments for the same (subject, modality) cannot
        // both succeed.
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        if self
            .by_subject
            .get(&wtxn, &idx)
            .map_err(LmdbError::from)?
            .is_some()
        {
            return Err(StoreError::Duplicate(format!(
                "{}/{}",
                credential.subject, credential.modality
            )));
        }
        self.by_id
            .put(&mut wtxn, credential.credential_id.as_bytes(), &bytes)
            .map_err(LmdbError::from)?;
        self.by_subject
            .put(&mut wtxn, &idx, credential.credential_id.as_bytes())
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn get(&self, subject: &SubjectId, modality: Modality) -> Result<Credential, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let id = self
            .by_subject
            .get(&rtxn, &index_key(subject, modality))
            .map_err(LmdbError::from)?
            .ok_or_else(|| StoreError::NotFound(format!("{subject}/{modality}")))?;
        let raw = self
            .by_id
            .get(&rtxn, id)
            .map_err(LmdbError::from)?
            .ok_or_else(|| {
                StoreError::Corruption(format!(
                    "credential index points at missing row for {subject}/{modality}"
                ))
            })?;
        bincode::deserialize(raw).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn get_by_id(&self, credential_id: &CredentialId) -> Result<Credential, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let raw = self
            .by_id
            .get(&rtxn, credential_id.as_bytes())
            .map_err(LmdbError::from)?
            .ok_or_else(|| StoreError::NotFound(credential_id.to_hex()))?;
        bincode::deserialize(raw).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn allowed_ids(
        &self,
        subject: &SubjectId,
        modality: Modality,
    ) -> Result<Vec<CredentialId>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let id = self
            .by_subject
            .get(&rtxn, &index_key(subject, modality))
            .map_err(LmdbError::from)?;
        Ok(id.map(CredentialId::new).into_iter().collect())
    }

    fn bump_counter(
        &self,
        credential_id: &CredentialId,
        new_counter: u64,
    ) -> Result<(), StoreError> {
        // Compare-and-set under one write transaction. A read-then-write
        // across two transactions would let two stale assertions both pass.
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let raw = self
            .by_id
            .get(&wtxn, credential_id.as_bytes())
            .map_err(LmdbError::from)?
            .ok_or_else(|| StoreError::NotFound(credential_id.to_hex()))?;
        let mut credential: Credential =
            bincode::deserialize(raw).map_err(|e| StoreError::Serialization(e.to_string()))?;

        if new_counter <= credential.counter {
            return Err(StoreError::StaleCounter {
                credential_id: credential_id.to_hex(),
                reported: new_counter,
                stored: credential.counter,
            });
        }

        credential.counter = new_counter;
        let bytes =
            bincode::serialize(&credential).map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.by_id
            .put(&mut wtxn, credential_id.as_bytes(), &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LmdbEnvironment;
    use vita_types::{PublicKey, Timestamp, Transport};

    fn test_env() -> (tempfile::TempDir, LmdbEnvironment) {
        let dir = tempfile::tempdir().unwrap();
        let env = LmdbEnvironment::open(dir.path(), 10 * 1024 * 1024).unwrap();
        (dir, env)
    }

    fn credential(subject: &str, id: &[u8]) -> Credential {
        Credential {
            subject: SubjectId::new(subject),
            modality: Modality::FaceKey,
            credential_id: CredentialId::new(id),
            public_key: PublicKey([7u8; 32]),
            counter: 5,
            transports: vec![Transport::Internal],
            enrolled_at: Timestamp::new(1000),
        }
    }

    #[test]
    fn enroll_then_lookup() {
        let (_dir, env) = test_env();
        let store = env.credentials();
        store.enroll(&credential("s1", b"cred-1")).unwrap();

        let found = store.get(&SubjectId::new("s1"), Modality::FaceKey).unwrap();
        assert_eq!(found.credential_id.as_bytes(), b"cred-1");
        assert_eq!(found.counter, 5);

        let ids = store
            .allowed_ids(&SubjectId::new("s1"), Modality::FaceKey)
            .unwrap();
        assert_eq!(ids, vec![CredentialId::new(b"cred-1".to_vec())]);
    }

    #[test]
    fn duplicate_enroll_rejected_without_mutation() {
        let (_dir, env) = test_env();
        let store = env.credentials();
        store.enroll(&credential("s1", b"cred-1")).unwrap();

        let second = credential("s1", b"cred-2");
        assert!(matches!(
            store.enroll(&second),
            Err(StoreError::Duplicate(_))
        ));
        let kept = store.get(&SubjectId::new("s1"), Modality::FaceKey).unwrap();
        assert_eq!(kept.credential_id.as_bytes(), b"cred-1");
    }

    #[test]
    fn bump_counter_enforces_strict_increase() {
        let (_dir, env) = test_env();
        let store = env.credentials();
        store.enroll(&credential("s1", b"cred-1")).unwrap();
        let id = CredentialId::new(b"cred-1".to_vec());

        // Equal to stored: stale.
        assert!(matches!(
            store.bump_counter(&id, 5),
            Err(StoreError::StaleCounter { stored: 5, .. })
        ));
        assert_eq!(store.get_by_id(&id).unwrap().counter, 5);

        store.bump_counter(&id, 6).unwrap();
        assert_eq!(store.get_by_id(&id).unwrap().counter, 6);
    }

    #[test]
    fn modalities_are_independent() {
        let (_dir, env) = test_env();
        let store = env.credentials();
        store.enroll(&credential("s1", b"cred-face")).unwrap();

        let mut fp = credential("s1", b"cred-fp");
        fp.modality = Modality::FingerprintKey;
        store.enroll(&fp).unwrap();

        assert_eq!(
            store
                .allowed_ids(&SubjectId::new("s1"), Modality::FingerprintKey)
                .unwrap()
                .len(),
            1
        );
    }
}
