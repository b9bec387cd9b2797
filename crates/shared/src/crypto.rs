//! Hashing helpers for admin key checks and log redaction.

use sha2::{Digest, Sha256};

/// Computes SHA-256 hash of the input and returns it as a hex string.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Compares a presented key against the expected one.
///
/// Both sides are hashed first so the comparison runs over equal-length
/// digests and takes the same time wherever the keys differ.
pub fn keys_match(provided: &str, expected: &str) -> bool {
    let a = Sha256::digest(provided.as_bytes());
    let b = Sha256::digest(expected.as_bytes());
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Masks all but the first two characters of a PIN for logging.
pub fn redact_pin(pin: &str) -> String {
    pin.chars()
        .enumerate()
        .map(|(i, c)| if i < 2 { c } else { '*' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hex() {
        let hash = sha256_hex("test");
        assert_eq!(hash.len(), 64);
        assert_eq!(
            hash,
            "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08"
        );
    }

    #[test]
    fn test_sha256_hex_empty_string() {
        assert_eq!(
            sha256_hex(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_sha256_hex_unicode() {
        assert_eq!(sha256_hex("cumpleaños").len(), 64);
    }

    #[test]
    fn test_keys_match() {
        assert!(keys_match("secret-admin-key", "secret-admin-key"));
        assert!(!keys_match("secret-admin-key", "secret-admin-kez"));
        assert!(!keys_match("", "secret-admin-key"));
        assert!(!keys_match("secret-admin-key-longer", "secret-admin-key"));
    }

    #[test]
    fn test_redact_pin() {
        assert_eq!(redact_pin("2210"), "22**");
        assert_eq!(redact_pin("1"), "1");
        assert_eq!(redact_pin(""), "");
        assert_eq!(redact_pin("123456"), "12****");
    }
}
