//! Abstract storage traits for the Vita re-verification protocol.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The ceremony handlers depend only on the traits, constructed
//! once and passed in by handle, never on a concrete backend.
//!
//! Two contracts here carry the protocol's concurrency guarantees and must
//! be honoured by every backend:
//! - [`ChallengeStore::consume`] is an atomic read-and-delete;
//! - [`CredentialStore::bump_counter`] is an atomic compare-and-set.

pub mod attempt;
pub mod challenge;
pub mod credential;
pub mod error;
pub mod reference;
pub mod review;
pub mod subject;

pub use attempt::AttemptStore;
pub use challenge::ChallengeStore;
pub use credential::CredentialStore;
pub use error::StoreError;
pub use reference::ReferenceImageStore;
pub use review::ReviewStore;
pub use subject::SubjectStore;
