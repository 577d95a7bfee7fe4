use std::time::Duration;

use jsonwebtoken::Algorithm;

/// Configuration for session token security settings.
///
/// Constructed once at startup and injected into [`crate::state::app_state::AppState`];
/// never a process-global, so tests can run with per-test secrets.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// Symmetric secret for signing and verifying session tokens
    pub jwt_secret: Vec<u8>,
    /// Signing algorithm (defaults to HS256)
    pub algorithm: Algorithm,
    /// Session token lifetime, enforced solely through the `exp` claim
    pub token_ttl: Duration,
}

impl SecurityConfig {
    /// Default session lifetime: 24 hours.
    pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(24 * 60 * 60);

    /// Create a new SecurityConfig with the given secret.
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            algorithm: Algorithm::HS256,
            token_ttl: Self::DEFAULT_TOKEN_TTL,
        }
    }

    /// Override the session token lifetime.
    pub fn with_token_ttl(mut self, token_ttl: Duration) -> Self {
        self.token_ttl = token_ttl;
        self
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self::new(b"default_secret_for_tests_only".to_vec())
    }
}
