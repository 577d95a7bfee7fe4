use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::auth::claims::AccessClaims;
use crate::error::AppError;
use crate::state::security_config::SecurityConfig;

/// `iss` claim stamped into every token this backend mints.
pub const TOKEN_ISSUER: &str = "ledgerly";

/// Mint a signed session token bound to the given user.
///
/// Deterministic for identical inputs: the claims are derived entirely from
/// `sub`, `email`, `now` and the configured TTL.
pub fn mint_access_token(
    sub: Uuid,
    email: &str,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    if security.jwt_secret.is_empty() {
        return Err(AppError::signing("Signing secret is not configured"));
    }

    let iat = now
        .duration_since(UNIX_EPOCH)
        .map_err(|_| AppError::internal("Failed to get current time"))?
        .as_secs() as i64;
    let exp = iat + security.token_ttl.as_secs() as i64;

    let claims = AccessClaims {
        sub,
        email: email.to_string(),
        iss: TOKEN_ISSUER.to_string(),
        iat,
        nbf: iat,
        exp,
    };

    encode(
        &Header::new(security.algorithm),
        &claims,
        &EncodingKey::from_secret(&security.jwt_secret),
    )
    .map_err(|e| AppError::signing(format!("Failed to encode session token: {e}")))
}

/// Verify a session token and return its claims.
///
/// Checks, in order: part count, declared header algorithm (before any
/// signature work), signature, `exp`, `nbf` and `iss` — with zero leeway.
/// jsonwebtoken's default of 60 s of clock-skew allowance is deliberately
/// disabled; expiry is exact.
///
/// Errors:
/// - `AppError::MalformedToken` — wrong part count or undecodable segment
/// - `AppError::UnsupportedAlgorithm` — header declares anything but the
///   configured HMAC algorithm (`none` included)
/// - `AppError::SignatureInvalid` — recomputed signature does not match
/// - `AppError::TokenExpired` — `exp` in the past
/// - `AppError::TokenNotYetValid` — `nbf` in the future
pub fn verify_access_token(
    token: &str,
    security: &SecurityConfig,
) -> Result<AccessClaims, AppError> {
    check_declared_algorithm(token, security.algorithm)?;

    let mut validation = Validation::new(security.algorithm);
    validation.validate_exp = true;
    validation.validate_nbf = true;
    validation.leeway = 0;
    validation.set_issuer(&[TOKEN_ISSUER]);

    decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(&security.jwt_secret),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::token_expired(),
        jsonwebtoken::errors::ErrorKind::ImmatureSignature => AppError::token_not_yet_valid(),
        jsonwebtoken::errors::ErrorKind::InvalidSignature => AppError::signature_invalid(),
        jsonwebtoken::errors::ErrorKind::InvalidAlgorithm => AppError::unsupported_algorithm(),
        _ => AppError::malformed_token(),
    })
}

/// Reject tokens whose header declares anything but the configured HMAC
/// algorithm, before any signature verification happens. A token claiming
/// `none` or a different signature family must never be accepted.
fn check_declared_algorithm(token: &str, algorithm: Algorithm) -> Result<(), AppError> {
    let mut parts = token.split('.');
    let header_b64 = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(header), Some(_payload), Some(_signature), None) => header,
        _ => return Err(AppError::malformed_token()),
    };

    let header_bytes = URL_SAFE_NO_PAD
        .decode(header_b64)
        .map_err(|_| AppError::malformed_token())?;
    let header: serde_json::Value =
        serde_json::from_slice(&header_bytes).map_err(|_| AppError::malformed_token())?;
    let declared = header
        .get("alg")
        .and_then(|v| v.as_str())
        .ok_or_else(AppError::malformed_token)?;

    match hmac_alg_name(algorithm) {
        Some(expected) if declared == expected => Ok(()),
        _ => Err(AppError::unsupported_algorithm()),
    }
}

fn hmac_alg_name(algorithm: Algorithm) -> Option<&'static str> {
    match algorithm {
        Algorithm::HS256 => Some("HS256"),
        Algorithm::HS384 => Some("HS384"),
        Algorithm::HS512 => Some("HS512"),
        _ => None,
    }
}
