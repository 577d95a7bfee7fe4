//! Claims and identity types used across the authentication layer.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims embedded in a backend-issued session token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AccessClaims {
    /// Authoritative user identifier (users.id)
    pub sub: Uuid,
    /// Informational; authorization decisions key off `sub`
    pub email: String,
    /// Issuing system, always [`TOKEN_ISSUER`](super::jwt::TOKEN_ISSUER)
    pub iss: String,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Not-before (seconds since epoch, equals `iat`)
    pub nbf: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}

/// Resolved identity for one request, inserted into request extensions by the
/// session guard after token validation. Write-once, scoped to the request,
/// read back through the `CurrentUser` extractor.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub email: String,
}
