//! Password hashing and verification.
//!
//! Uses PBKDF2 through the `password-hash` API; hashes are stored in PHC
//! string format so parameters can be tightened later without a migration.

use pbkdf2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use pbkdf2::Pbkdf2;
use rand_core::OsRng;

use super::error::Error;

/// Hash a plaintext password with a fresh random salt.
pub fn hash_password(plaintext: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);
    Pbkdf2
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| Error::internal(format!("failed to hash password: {err}")))
}

/// Check a plaintext password against a stored PHC hash string.
///
/// A malformed stored hash is an internal error, not a failed login.
pub fn verify_password(plaintext: &str, stored: &str) -> Result<bool, Error> {
    let parsed = PasswordHash::new(stored)
        .map_err(|err| Error::internal(format!("stored password hash is invalid: {err}")))?;
    Ok(Pbkdf2.verify_password(plaintext.as_bytes(), &parsed).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn hash_then_verify_round_trips() {
        let hash = hash_password("secret1").expect("hashing succeeds");
        assert!(verify_password("secret1", &hash).expect("verification runs"));
        assert!(!verify_password("wrong", &hash).expect("verification runs"));
    }

    #[rstest]
    fn hashes_are_salted() {
        let first = hash_password("secret1").expect("hashing succeeds");
        let second = hash_password("secret1").expect("hashing succeeds");
        assert_ne!(first, second);
    }

    #[rstest]
    fn malformed_hash_is_internal_error() {
        let err = verify_password("secret1", "not-a-phc-string").expect_err("must fail");
        assert_eq!(err.code(), crate::domain::ErrorCode::InternalError);
    }
}
