//! Password hashing.
//!
//! Argon2id with per-password random salts, PHC string format. The
//! parameters ride inside the stored hash, so verification keeps
//! working if the defaults change in a later release.

use crate::error::{DbError, DbResult};
use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, SaltString};
use argon2::{Argon2, PasswordVerifier};

/// Hash a password for storage
pub fn hash_password(password: &str) -> DbResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| DbError::Internal(format!("password hashing failed: {e}")))
}

/// Check a password against a stored hash.
///
/// An unparseable hash verifies as false rather than erroring: from
/// the caller's side a corrupt hash and a wrong password are the same
/// "no".
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
