//! Password policy, generation, and verification.

use argon2::{Argon2, PasswordVerifier};
use rand::Rng;
use rand::seq::SliceRandom;
use rhub_core::error::RhubError;

const UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWER: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const DIGITS: &[u8] = b"0123456789";
const SPECIAL: &[u8] = b"@#$%&*";

/// Generated temporary password length.
const TEMP_PASSWORD_LEN: usize = 12;

/// Whether a password satisfies the complexity policy: at least 8
/// characters with an upper-case letter, a lower-case letter, a digit,
/// and one of `@#$%&*`.
pub fn is_complex(password: &str) -> bool {
    password.len() >= 8
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| SPECIAL.contains(&(c as u8)))
}

/// Generate a temporary password guaranteed to satisfy the policy:
/// one character from each class, the rest drawn from all classes,
/// then shuffled.
pub fn generate_temporary() -> String {
    let mut rng = rand::thread_rng();
    let all: Vec<u8> = [UPPER, LOWER, DIGITS, SPECIAL].concat();

    let mut chars = vec![
        UPPER[rng.gen_range(0..UPPER.len())],
        LOWER[rng.gen_range(0..LOWER.len())],
        DIGITS[rng.gen_range(0..DIGITS.len())],
        SPECIAL[rng.gen_range(0..SPECIAL.len())],
    ];
    while chars.len() < TEMP_PASSWORD_LEN {
        chars.push(all[rng.gen_range(0..all.len())]);
    }
    chars.shuffle(&mut rng);

    String::from_utf8(chars).expect("password characters are ASCII")
}

/// Verify a plaintext password against an Argon2id PHC-format hash.
///
/// Returns `Ok(true)` on match, `Ok(false)` on mismatch, or an error
/// if the stored hash is malformed.
pub fn verify(password: &str, hash: &str) -> Result<bool, RhubError> {
    let parsed_hash = argon2::PasswordHash::new(hash)
        .map_err(|e| RhubError::Internal(format!("invalid hash format: {e}")))?;

    let argon2 = Argon2::default();
    match argon2.verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(RhubError::Internal(format!("verify error: {e}"))),
    }
}
