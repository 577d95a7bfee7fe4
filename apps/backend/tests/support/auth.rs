//! Session token helpers for tests

use std::time::{Duration, SystemTime};

use backend::auth::jwt::mint_access_token;
use backend::state::security_config::SecurityConfig;
use uuid::Uuid;

/// Mint a valid session token for the given user
pub fn mint_test_token(sub: Uuid, email: &str, sec: &SecurityConfig) -> String {
    mint_access_token(sub, email, SystemTime::now(), sec).expect("should mint token successfully")
}

/// Full Authorization header value including the "Bearer " prefix
pub fn bearer_header(sub: Uuid, email: &str, sec: &SecurityConfig) -> String {
    format!("Bearer {}", mint_test_token(sub, email, sec))
}

/// Mint a token whose lifetime has already elapsed
pub fn mint_expired_token(sub: Uuid, email: &str, sec: &SecurityConfig) -> String {
    let past_time = SystemTime::now()
        .checked_sub(sec.token_ttl + Duration::from_secs(3600))
        .expect("clock predates epoch");
    mint_access_token(sub, email, past_time, sec).expect("should mint expired token successfully")
}
