//! Session issuing: registration and login against the user store.

use sea_orm::ConnectionTrait;
use tracing::info;

use crate::auth::password;
use crate::error::AppError;
use crate::logging::pii::Redacted;
use crate::repos::users::{self, User};

/// Lowercase and trim an email so lookups and the unique index agree on a
/// single comparison key.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

/// Register a new user: hash the password on the blocking pool, then insert.
///
/// No advisory existence pre-check: the unique index on `users.email` is the
/// serialization point between concurrent registrations, and the constraint
/// violation it raises is the authoritative duplicate signal (surfaced as
/// `DUPLICATE_EMAIL` by the error mapping).
pub async fn register_user(
    conn: &(impl ConnectionTrait + Send + Sync),
    email: &str,
    password: &str,
) -> Result<User, AppError> {
    let email = normalize_email(email);
    let password_hash = password::hash_password_blocking(password.to_string()).await?;

    let user = users::create(conn, &email, &password_hash)
        .await
        .map_err(AppError::from)?;

    info!(user_id = %user.id, email = %Redacted(&email), "user registered");
    Ok(user)
}

/// Authenticate an existing user by email and password.
///
/// Unknown email and wrong password both return the same
/// `INVALID_CREDENTIALS` failure; the two paths must stay indistinguishable
/// to the caller so accounts cannot be enumerated.
pub async fn authenticate_user(
    conn: &(impl ConnectionTrait + Send + Sync),
    email: &str,
    password: &str,
) -> Result<User, AppError> {
    let email = normalize_email(email);

    let user = users::find_by_email(conn, &email)
        .await
        .map_err(AppError::from)?;
    let Some(user) = user else {
        return Err(AppError::invalid_credentials());
    };

    let password_matches =
        password::verify_password_blocking(password.to_string(), user.password_hash.clone())
            .await?;
    if !password_matches {
        return Err(AppError::invalid_credentials());
    }

    info!(user_id = %user.id, email = %Redacted(&email), "login succeeded");
    Ok(user)
}
