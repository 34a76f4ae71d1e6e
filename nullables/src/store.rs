//! Nullable store: thread-safe in-memory storage for testing.
//!
//! One `NullStore` implements every storage trait. Each logical store
//! guards its maps with a single mutex, which makes the multi-map
//! operations (enroll, consume, decide) atomic the same way the LMDB
//! write transaction does.

use std::collections::HashMap;
use std::sync::Mutex;

use vita_store::{
    AttemptStore, ChallengeStore, CredentialStore, ReferenceImageStore, ReviewStore, StoreError,
    SubjectStore,
};
use vita_types::{
    CaseId, ChallengeKey, Credential, CredentialId, Modality, OfficerId, ReviewCase,
    ReviewDecision, ReviewStatus, Standing, SubjectId, SubjectRecord, Timestamp,
    VerificationAttempt,
};

struct StoredChallenge {
    value: Vec<u8>,
    expires_at: u64,
}

#[derive(Default)]
struct Credentials {
    by_id: HashMap<Vec<u8>, Credential>,
    by_subject: HashMap<(String, Modality), Vec<u8>>,
}

/// An in-memory implementation of every Vita storage trait.
/// Thread-safe for use with tokio's multi-threaded runtime.
#[derive(Default)]
pub struct NullStore {
    challenges: Mutex<HashMap<String, StoredChallenge>>,
    credentials: Mutex<Credentials>,
    attempts: Mutex<HashMap<String, Vec<VerificationAttempt>>>,
    reviews: Mutex<HashMap<String, ReviewCase>>,
    subjects: Mutex<HashMap<String, SubjectRecord>>,
    references: Mutex<HashMap<String, Vec<u8>>>,
}

impl NullStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a subject record (normally owned by the registration system).
    pub fn add_subject(&self, record: SubjectRecord) {
        self.subjects
            .lock()
            .unwrap()
            .insert(record.id.as_str().to_string(), record);
    }
}

impl ChallengeStore for NullStore {
    fn put(
        &self,
        key: &ChallengeKey,
        value: &[u8],
        ttl_secs: u64,
        now: Timestamp,
    ) -> Result<(), StoreError> {
        self.challenges.lock().unwrap().insert(
            key.storage_key(),
            StoredChallenge {
                value: value.to_vec(),
                expires_at: now.plus(ttl_secs).as_secs(),
            },
        );
        Ok(())
    }

    fn consume(&self, key: &ChallengeKey, now: Timestamp) -> Result<Vec<u8>, StoreError> {
        let storage_key = key.storage_key();
        // Remove-then-inspect under one lock: read-and-delete is atomic.
        let stored = self
            .challenges
            .lock()
            .unwrap()
            .remove(&storage_key)
            .ok_or_else(|| StoreError::NotFound(storage_key.clone()))?;
        if now.as_secs() >= stored.expires_at {
            return Err(StoreError::NotFound(storage_key));
        }
        Ok(stored.value)
    }
}

impl CredentialStore for NullStore {
    fn enroll(&self, credential: &Credential) -> Result<(), StoreError> {
        let mut creds = self.credentials.lock().unwrap();
        let subject_key = (
            credential.subject.as_str().to_string(),
            credential.modality,
        );
        if creds.by_subject.contains_key(&subject_key) {
            return Err(StoreError::Duplicate(format!(
                "{}/{}",
                credential.subject, credential.modality
            )));
        }
        creds
            .by_subject
            .insert(subject_key, credential.credential_id.as_bytes().to_vec());
        creds
            .by_id
            .insert(credential.credential_id.as_bytes().to_vec(), credential.clone());
        Ok(())
    }

    fn get(&self, subject: &SubjectId, modality: Modality) -> Result<Credential, StoreError> {
        let creds = self.credentials.lock().unwrap();
        let id = creds
            .by_subject
            .get(&(subject.as_str().to_string(), modality))
            .ok_or_else(|| StoreError::NotFound(format!("{subject}/{modality}")))?;
        creds
            .by_id
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::Corruption(format!("{subject}/{modality}")))
    }

    fn get_by_id(&self, credential_id: &CredentialId) -> Result<Credential, StoreError> {
        self.credentials
            .lock()
            .unwrap()
            .by_id
            .get(credential_id.as_bytes())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(credential_id.to_hex()))
    }

    fn allowed_ids(
        &self,
        subject: &SubjectId,
        modality: Modality,
    ) -> Result<Vec<CredentialId>, StoreError> {
        Ok(self
            .credentials
            .lock()
            .unwrap()
            .by_subject
            .get(&(subject.as_str().to_string(), modality))
            .map(|id| CredentialId::new(id.clone()))
            .into_iter()
            .collect())
    }

    fn bump_counter(
        &self,
        credential_id: &CredentialId,
        new_counter: u64,
    ) -> Result<(), StoreError> {
        let mut creds = self.credentials.lock().unwrap();
        let credential = creds
            .by_id
            .get_mut(credential_id.as_bytes())
            .ok_or_else(|| StoreError::NotFound(credential_id.to_hex()))?;
        if new_counter <= credential.counter {
            return Err(StoreError::StaleCounter {
                credential_id: credential_id.to_hex(),
                reported: new_counter,
                stored: credential.counter,
            });
        }
        credential.counter = new_counter;
        Ok(())
    }
}

impl AttemptStore for NullStore {
    fn append(&self, attempt: &VerificationAttempt) -> Result<(), StoreError> {
        self.attempts
            .lock()
            .unwrap()
            .entry(attempt.subject.as_str().to_string())
            .or_default()
            .push(attempt.clone());
        Ok(())
    }

    fn list(&self, subject: &SubjectId) -> Result<Vec<VerificationAttempt>, StoreError> {
        Ok(self
            .attempts
            .lock()
            .unwrap()
            .get(subject.as_str())
            .cloned()
            .unwrap_or_default())
    }
}

impl ReviewStore for NullStore {
    fn create(&self, case: &ReviewCase) -> Result<(), StoreError> {
        self.reviews
            .lock()
            .unwrap()
            .insert(case.id.as_str().to_string(), case.clone());
        Ok(())
    }

    fn get(&self, case_id: &CaseId) -> Result<ReviewCase, StoreError> {
        self.reviews
            .lock()
            .unwrap()
            .get(case_id.as_str())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(case_id.to_string()))
    }

    fn decide(
        &self,
        case_id: &CaseId,
        decision: ReviewDecision,
        officer: &OfficerId,
        now: Timestamp,
    ) -> Result<ReviewCase, StoreError> {
        let mut reviews = self.reviews.lock().unwrap();
        let case = reviews
            .get_mut(case_id.as_str())
            .ok_or_else(|| StoreError::NotFound(case_id.to_string()))?;
        if case.status != ReviewStatus::Pending {
            return Err(StoreError::AlreadyDecided(case_id.to_string()));
        }
        case.status = decision.resulting_status();
        case.decided_at = Some(now);
        case.decided_by = Some(officer.clone());
        Ok(case.clone())
    }

    fn list_pending(&self) -> Result<Vec<ReviewCase>, StoreError> {
        let mut pending: Vec<ReviewCase> = self
            .reviews
            .lock()
            .unwrap()
            .values()
            .filter(|c| c.status == ReviewStatus::Pending)
            .cloned()
            .collect();
        pending.sort_by_key(|c| c.opened_at);
        Ok(pending)
    }
}

impl SubjectStore for NullStore {
    fn get(&self, subject: &SubjectId) -> Result<SubjectRecord, StoreError> {
        self.subjects
            .lock()
            .unwrap()
            .get(subject.as_str())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(subject.to_string()))
    }

    fn set_standing(
        &self,
        subject: &SubjectId,
        standing: Standing,
        next_due: Option<Timestamp>,
    ) -> Result<(), StoreError> {
        let mut subjects = self.subjects.lock().unwrap();
        let record = subjects
            .get_mut(subject.as_str())
            .ok_or_else(|| StoreError::NotFound(subject.to_string()))?;
        record.standing = standing;
        if next_due.is_some() {
            record.next_due = next_due;
        }
        Ok(())
    }
}

impl ReferenceImageStore for NullStore {
    fn get_reference(&self, subject: &SubjectId) -> Result<Vec<u8>, StoreError> {
        self.references
            .lock()
            .unwrap()
            .get(subject.as_str())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(subject.to_string()))
    }

    fn put_reference(&self, subject: &SubjectId, image: &[u8]) -> Result<(), StoreError> {
        self.references
            .lock()
            .unwrap()
            .insert(subject.as_str().to_string(), image.to_vec());
        Ok(())
    }
}
