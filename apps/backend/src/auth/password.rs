//! Password hashing with Argon2id.
//!
//! Hashing is intentionally expensive (tens of milliseconds), so the async
//! entry points run it on actix's bounded blocking pool rather than on the
//! executor threads that service other requests.

use actix_web::web;
use argon2::password_hash::{
    rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
};
use argon2::Argon2;

use crate::error::AppError;

/// Hash a plaintext password into a PHC-formatted Argon2id string.
///
/// Uses the crate defaults (Argon2id v19, m=19456 KiB, t=2, p=1 — the
/// OWASP-recommended parameters) with a fresh OS-random salt. The PHC string
/// embeds algorithm, version, parameters and salt, so verification needs no
/// side-channel state.
///
/// Fails only when the salt cannot be generated or the hasher cannot run;
/// never on valid input.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::hashing(format!("Password hashing failed: {e}")))
}

/// Verify a plaintext password against a stored PHC hash.
///
/// Recomputes the digest with the parameters embedded in `hash` and compares
/// in constant time. Returns `Ok(false)` on mismatch; errors only when the
/// stored hash is not a valid PHC string.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AppError::malformed_hash())?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(_) => Ok(false),
    }
}

/// [`hash_password`] on the blocking worker pool.
pub async fn hash_password_blocking(password: String) -> Result<String, AppError> {
    web::block(move || hash_password(&password))
        .await
        .map_err(|_| AppError::hashing("Blocking worker pool unavailable"))?
}

/// [`verify_password`] on the blocking worker pool.
pub async fn verify_password_blocking(password: String, hash: String) -> Result<bool, AppError> {
    web::block(move || verify_password(&password, &hash))
        .await
        .map_err(|_| AppError::hashing("Blocking worker pool unavailable"))?
}
