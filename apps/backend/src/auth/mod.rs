//! Authentication core: session token codec and credential hashing.

/// Name of the HttpOnly cookie carrying the session token. The guard checks
/// it before falling back to the Authorization header.
pub const SESSION_COOKIE: &str = "auth_token";

pub mod claims;
pub mod jwt;
pub mod password;

pub use claims::{AccessClaims, AuthenticatedUser};
pub use jwt::{mint_access_token, verify_access_token, TOKEN_ISSUER};
