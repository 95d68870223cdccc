//! Password-reset codes.
//!
//! A reset code is 6 decimal digits, emailed to the user. Only its SHA-256
//! hex digest is stored, next to a 10-minute expiry.

use rand::Rng;
use sha2::{Digest, Sha256};

/// How long a reset code stays valid.
pub const RESET_CODE_TTL_MINUTES: i64 = 10;

/// Generate a 6-digit code, zero-padded.
pub fn generate_code() -> String {
    let n: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{n:06}")
}

/// SHA-256 hex digest of a code, as stored in `users.reset_code_hash`.
pub fn hash_code(code: &str) -> String {
    let digest = Sha256::digest(code.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_is_six_digits() {
        for _ in 0..100 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn digest_matches_known_vector() {
        assert_eq!(
            hash_code("123456"),
            "8d969eef6ecad3c29a3a629280e686cf0c3f5d5a86aff3ca12020c923adc6c92"
        );
    }

    #[test]
    fn digest_is_deterministic_and_distinct() {
        assert_eq!(hash_code("000042"), hash_code("000042"));
        assert_ne!(hash_code("000042"), hash_code("000043"));
    }
}
