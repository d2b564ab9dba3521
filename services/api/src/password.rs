//! Argon2id password hashing.

use std::sync::LazyLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hash(argon2::password_hash::Error),

    #[error("stored password hash is malformed: {0}")]
    MalformedHash(argon2::password_hash::Error),
}

/// Hash a plaintext password into a PHC string with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(PasswordError::Hash)
}

/// Check a plaintext password against a stored PHC hash.
///
/// The comparison inside argon2 runs in constant time. A mismatch is
/// `Ok(false)`; only a corrupt stored hash is an error.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(PasswordError::MalformedHash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(error) => Err(PasswordError::MalformedHash(error)),
    }
}

static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("no-account-has-this-password").ok());

/// Spend one verification's worth of work against a hash no account owns.
///
/// Logins for unknown emails call this so they take as long as a wrong
/// password for a known one.
pub fn verify_dummy(password: &str) {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_password(password, hash);
    }
}
