//! Enrolled-credential storage.

use crate::StoreError;
use vita_types::{Credential, CredentialId, Modality, SubjectId};

/// Durable registry of enrolled public-key credentials.
pub trait CredentialStore: Send + Sync {
    /// Persist a newly enrolled credential.
    ///
    /// Returns `Duplicate` if a credential already exists for the same
    /// (subject, modality), without mutating the existing row. The
    /// existence check and the insert are one atomic operation.
    fn enroll(&self, credential: &Credential) -> Result<(), StoreError>;

    /// Look up the credential enrolled for (subject, modality).
    fn get(&self, subject: &SubjectId, modality: Modality) -> Result<Credential, StoreError>;

    /// Look up a credential by its authenticator-assigned identifier.
    fn get_by_id(&self, credential_id: &CredentialId) -> Result<Credential, StoreError>;

    /// All credential identifiers enrolled for (subject, modality).
    ///
    /// Used to scope an authentication ceremony to the subject's own
    /// credentials. Empty when nothing is enrolled.
    fn allowed_ids(
        &self,
        subject: &SubjectId,
        modality: Modality,
    ) -> Result<Vec<CredentialId>, StoreError>;

    /// Conditionally advance the signature counter.
    ///
    /// Atomic compare-and-set: succeeds only if `new_counter` is strictly
    /// greater than the stored counter, otherwise returns `StaleCounter`
    /// and leaves the row untouched. A read-then-write sequence here is
    /// unsafe under concurrent authentication attempts.
    fn bump_counter(
        &self,
        credential_id: &CredentialId,
        new_counter: u64,
    ) -> Result<(), StoreError>;
}
