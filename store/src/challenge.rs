//! Single-use, TTL-bound challenge storage.

use crate::StoreError;
use vita_types::{ChallengeKey, Timestamp};

/// Ephemeral ceremony-challenge storage.
///
/// Must be shared and reachable from every request-handling instance: the
/// two phases of a ceremony may be served by different processes, so a
/// per-process map is never a valid backend outside tests.
pub trait ChallengeStore: Send + Sync {
    /// Store a challenge under `key`, overwriting any existing value.
    ///
    /// The challenge expires `ttl_secs` after `now`.
    fn put(
        &self,
        key: &ChallengeKey,
        value: &[u8],
        ttl_secs: u64,
        now: Timestamp,
    ) -> Result<(), StoreError>;

    /// Atomically read and delete the challenge under `key`.
    ///
    /// Read-and-delete in one operation: of two concurrent consumers, at
    /// most one observes the value. Returns `NotFound` both when the key
    /// never existed and when its TTL has elapsed; callers cannot tell
    /// these apart and must treat both as "ceremony expired, restart".
    fn consume(&self, key: &ChallengeKey, now: Timestamp) -> Result<Vec<u8>, StoreError>;
}
