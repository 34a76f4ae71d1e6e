//! Secure randomness for challenges and case identifiers.

use rand::rngs::OsRng;
use rand::RngCore;

/// Length in bytes of a ceremony challenge.
pub const CHALLENGE_LEN: usize = 32;

/// Generate a fresh single-use ceremony challenge.
pub fn random_challenge() -> [u8; CHALLENGE_LEN] {
    let mut bytes = [0u8; CHALLENGE_LEN];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Generate a review-case identifier (16 random bytes, hex-encoded).
pub fn random_case_id() -> String {
    let mut bytes = [0u8; 16];
    OsRng.fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn challenges_are_unique() {
        assert_ne!(random_challenge(), random_challenge());
    }

    #[test]
    fn case_id_is_32_hex_chars() {
        let id = random_case_id();
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
