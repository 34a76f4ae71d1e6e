//! Nullable infrastructure for deterministic testing.
//!
//! All external dependencies of the re-verification core (clock, storage,
//! the face-comparison collaborator) sit behind traits. This crate
//! provides test-friendly implementations that:
//! - return deterministic values,
//! - can be controlled programmatically,
//! - never touch the filesystem or network.
//!
//! The in-memory store honours the same conflict semantics as the LMDB
//! backend (duplicate enrollment, stale counter, decide-once), so tests
//! written against it exercise the real contracts.

pub mod clock;
pub mod comparer;
pub mod store;

pub use clock::NullClock;
pub use comparer::NullComparer;
pub use store::NullStore;
