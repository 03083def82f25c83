//! Password-reset token generation and hashing.
//!
//! The plaintext token is mailed to the account owner exactly once; only its
//! SHA-256 hex digest is stored, alongside a 10-minute expiry. Verifying a
//! reset request re-hashes the presented token and compares digests, so a
//! database leak never exposes a usable token.

use rand::Rng;
use sha2::{Digest, Sha256};

use crate::types::Timestamp;

/// Length of the generated reset token string (alphanumeric characters).
pub const RESET_TOKEN_LENGTH: usize = 64;

/// How long a reset token stays valid after being issued.
pub const RESET_TOKEN_TTL_MINUTES: i64 = 10;

/// The result of generating a new reset token.
pub struct GeneratedResetToken {
    /// The plaintext token (mailed to the user, never stored).
    pub plaintext: String,
    /// The SHA-256 hex digest of the plaintext (stored on the account).
    pub hash: String,
}

/// Generate a new single-use password-reset token.
pub fn generate_reset_token() -> GeneratedResetToken {
    let token: String = rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(RESET_TOKEN_LENGTH)
        .map(char::from)
        .collect();

    let hash = hash_reset_token(&token);

    GeneratedResetToken {
        plaintext: token,
        hash,
    }
}

/// Compute the SHA-256 hex digest of a reset token.
///
/// Used both when issuing a token (to store the hash) and when redeeming one
/// (to look the account up by hash).
pub fn hash_reset_token(token: &str) -> String {
    let hash = Sha256::digest(token.as_bytes());
    format!("{hash:x}")
}

/// Expiry timestamp for a token issued at `issued_at`.
pub fn expiry_from(issued_at: Timestamp) -> Timestamp {
    issued_at + chrono::Duration::minutes(RESET_TOKEN_TTL_MINUTES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_token_has_expected_shape() {
        let token = generate_reset_token();
        assert_eq!(token.plaintext.len(), RESET_TOKEN_LENGTH);
        assert!(token.plaintext.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(token.hash.len(), 64);
        assert!(token.hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn stored_hash_matches_rehash_of_plaintext() {
        let token = generate_reset_token();
        assert_eq!(hash_reset_token(&token.plaintext), token.hash);
    }

    #[test]
    fn tokens_are_unique() {
        let a = generate_reset_token();
        let b = generate_reset_token();
        assert_ne!(a.plaintext, b.plaintext);
        assert_ne!(a.hash, b.hash);
    }

    #[test]
    fn hash_uses_sha256_hex() {
        assert_eq!(
            hash_reset_token(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn expiry_is_ten_minutes_out() {
        let now = chrono::Utc::now();
        let expires = expiry_from(now);
        assert_eq!((expires - now).num_minutes(), RESET_TOKEN_TTL_MINUTES);
    }
}
