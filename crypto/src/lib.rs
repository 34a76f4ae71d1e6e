//! Cryptographic primitives for the Vita re-verification protocol.
//!
//! - **Ed25519** for credential assertion signing and verification
//! - **Blake2b-256** for relying-party and client-data hashing
//! - OS randomness for single-use challenges and case identifiers

pub mod hash;
pub mod keys;
pub mod random;
pub mod sign;

pub use hash::{blake2b_256, blake2b_256_multi};
pub use keys::{generate_keypair, keypair_from_seed, public_from_private};
pub use random::{random_case_id, random_challenge, CHALLENGE_LEN};
pub use sign::{sign_message, verify_signature};
