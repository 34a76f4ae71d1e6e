//! LMDB implementation of ReferenceImageStore.

use std::sync::Arc;

use heed::types::{Bytes, Str};
use heed::{Database, Env};

use vita_store::{ReferenceImageStore, StoreError};
use vita_types::SubjectId;

use crate::LmdbError;

pub struct LmdbReferenceImageStore {
    pub(crate) env: Arc<Env>,
    pub(crate) db: Database<Str, Bytes>,
}

impl ReferenceImageStore for LmdbReferenceImageStore {
    fn get_reference(&self, subject: &SubjectId) -> Result<Vec<u8>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        self.db
            .get(&rtxn, subject.as_str())
            .map_err(LmdbError::from)?
            .map(<[u8]>::to_vec)
            .ok_or_else(|| StoreError::NotFound(subject.to_string()))
    }

    fn put_reference(&self, subject: &SubjectId, image: &[u8]) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.db
            .put(&mut wtxn, subject.as_str(), image)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}
