//! LMDB storage backend for the Vita re-verification protocol.
//!
//! Implements all storage traits from `vita-store` using the `heed` LMDB
//! bindings. Each logical store maps to one or two LMDB databases within a
//! single environment; values are `bincode`-encoded.
//!
//! The two atomicity contracts the protocol relies on are discharged here:
//! challenge consumption is a get + delete inside one write transaction,
//! and the signature-counter bump is a compare-and-set inside one write
//! transaction. LMDB serialises write transactions, so of two concurrent
//! callers at most one can win either race.

pub mod attempt;
pub mod challenge;
pub mod credential;
pub mod environment;
pub mod error;
pub mod reference;
pub mod review;
pub mod subject;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;

/// Increment a key prefix in place to form an exclusive upper bound for a
/// prefix range-scan. Trailing 0xFF bytes are dropped before the carry.
pub(crate) fn increment_prefix(prefix: &mut Vec<u8>) {
    while let Some(&last) = prefix.last() {
        if last == 0xFF {
            prefix.pop();
        } else {
            *prefix.last_mut().expect("non-empty prefix") = last + 1;
            return;
        }
    }
}
