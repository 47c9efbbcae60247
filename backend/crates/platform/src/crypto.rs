//! Cryptographic utilities

use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};

/// Cryptographically secure random bytes
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// `len` random bytes, lowercase hex encoded.
///
/// Same shape as the database default for refresh tokens
/// (`encode(gen_random_bytes(32), 'hex')`).
pub fn random_hex_token(len: usize) -> String {
    hex::encode(random_bytes(len))
}

pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Short, non-reversible tag for a secret so it can appear in logs.
pub fn fingerprint(secret: &str) -> String {
    hex::encode(&sha256(secret.as_bytes())[..6])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_values() {
        let hash = sha256(b"");
        let expected =
            hex::decode("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855")
                .unwrap();
        assert_eq!(hash.to_vec(), expected);
    }

    #[test]
    fn test_random_hex_token_shape() {
        let token = random_hex_token(32);
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_ne!(token, random_hex_token(32));
        assert_eq!(hex::decode(&token).unwrap().len(), 32);
    }

    #[test]
    fn test_fingerprint_is_stable_and_short() {
        let a = fingerprint("refresh-token-value");
        assert_eq!(a, fingerprint("refresh-token-value"));
        assert_eq!(a.len(), 12);
        assert!(!a.contains("refresh"));
        assert_eq!(a, hex::encode(&sha256(b"refresh-token-value")[..6]));
    }
}
