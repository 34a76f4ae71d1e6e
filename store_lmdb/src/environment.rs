//! LMDB environment setup.

use std::path::Path;
use std::sync::Arc;

use heed::types::{Bytes, Str};
use heed::{Database, Env, EnvOpenOptions};

use crate::attempt::LmdbAttemptStore;
use crate::challenge::LmdbChallengeStore;
use crate::credential::LmdbCredentialStore;
use crate::reference::LmdbReferenceImageStore;
use crate::review::LmdbReviewStore;
use crate::subject::LmdbSubjectStore;
use crate::LmdbError;

const MAX_DBS: u32 = 8;

/// Wraps the LMDB environment and all database handles.
///
/// Opened once at startup; the per-store accessors hand out cheap clones
/// that share the environment.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    challenges_db: Database<Str, Bytes>,
    credentials_db: Database<Bytes, Bytes>,
    credential_index_db: Database<Str, Bytes>,
    attempts_db: Database<Bytes, Bytes>,
    attempt_seq_db: Database<Str, Bytes>,
    reviews_db: Database<Str, Bytes>,
    subjects_db: Database<Str, Bytes>,
    references_db: Database<Str, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given path.
    ///
    /// `map_size` is the maximum total size of the environment in bytes.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        // Safety contract of heed: no two environments over the same path
        // in one process. The caller opens exactly one at startup.
        let env = unsafe {
            EnvOpenOptions::new()
                .max_dbs(MAX_DBS)
                .map_size(map_size)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let challenges_db = env.create_database(&mut wtxn, Some("challenges"))?;
        let credentials_db = env.create_database(&mut wtxn, Some("credentials"))?;
        let credential_index_db =
            env.create_database(&mut wtxn, Some("credentials_by_subject"))?;
        let attempts_db = env.create_database(&mut wtxn, Some("attempts"))?;
        let attempt_seq_db = env.create_database(&mut wtxn, Some("attempt_seq"))?;
        let reviews_db = env.create_database(&mut wtxn, Some("review_cases"))?;
        let subjects_db = env.create_database(&mut wtxn, Some("subjects"))?;
        let references_db = env.create_database(&mut wtxn, Some("reference_images"))?;
        wtxn.commit()?;

        Ok(Self {
            env: Arc::new(env),
            challenges_db,
            credentials_db,
            credential_index_db,
            attempts_db,
            attempt_seq_db,
            reviews_db,
            subjects_db,
            references_db,
        })
    }

    pub fn challenges(&self) -> LmdbChallengeStore {
        LmdbChallengeStore {
            env: Arc::clone(&self.env),
            db: self.challenges_db,
        }
    }

    pub fn credentials(&self) -> LmdbCredentialStore {
        LmdbCredentialStore {
            env: Arc::clone(&self.env),
            by_id: self.credentials_db,
            by_subject: self.credential_index_db,
        }
    }

    pub fn attempts(&self) -> LmdbAttemptStore {
        LmdbAttemptStore {
            env: Arc::clone(&self.env),
            rows: self.attempts_db,
            seq: self.attempt_seq_db,
        }
    }

    pub fn reviews(&self) -> LmdbReviewStore {
        LmdbReviewStore {
            env: Arc::clone(&self.env),
            db: self.reviews_db,
        }
    }

    pub fn subjects(&self) -> LmdbSubjectStore {
        LmdbSubjectStore {
            env: Arc::clone(&self.env),
            db: self.subjects_db,
        }
    }

    pub fn references(&self) -> LmdbReferenceImageStore {
        LmdbReferenceImageStore {
            env: Arc::clone(&self.env),
            db: self.references_db,
        }
    }
}
