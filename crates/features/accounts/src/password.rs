use crate::error::AccountsError;
use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

/// Hashes a password with Argon2id using the library's default cost
/// parameters, producing a self-describing PHC string.
pub(crate) fn hash(password: &str) -> Result<String, AccountsError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hashed| hashed.to_string())
        .map_err(AccountsError::infrastructure)
}

/// Verifies a password against a stored PHC string.
///
/// Used by the (out-of-scope) login subsystem; kept here so the hash format
/// stays owned by one module.
#[must_use]
pub fn verify(password: &str, stored_hash: &str) -> bool {
    PasswordHash::new(stored_hash)
        .is_ok_and(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
}
