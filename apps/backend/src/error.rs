use actix_web::error::ResponseError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};
use crate::errors::ErrorCode;
use crate::trace_ctx;

#[derive(Serialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
    pub trace_id: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {detail}")]
    Validation { code: ErrorCode, detail: String },
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Missing session token")]
    MissingToken,
    #[error("Malformed session token")]
    MalformedToken,
    #[error("Unsupported token algorithm")]
    UnsupportedAlgorithm,
    #[error("Token signature invalid")]
    SignatureInvalid,
    #[error("Token expired")]
    TokenExpired,
    #[error("Token not yet valid")]
    TokenNotYetValid,
    #[error("Not found: {detail}")]
    NotFound { code: ErrorCode, detail: String },
    #[error("Conflict: {detail}")]
    Conflict { code: ErrorCode, detail: String },
    #[error("Hashing failure: {detail}")]
    Hashing { detail: String },
    #[error("Malformed password hash")]
    MalformedHash,
    #[error("Signing failure: {detail}")]
    Signing { detail: String },
    #[error("Database error: {detail}")]
    Db { detail: String },
    #[error("Database unavailable")]
    DbUnavailable,
    #[error("Database timeout")]
    DbTimeout,
    #[error("Internal error: {detail}")]
    Internal { detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
}

impl AppError {
    /// Internal error code, as it appears in logs. For the token-validation
    /// family this is more specific than what the HTTP response carries.
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { code, .. } => *code,
            AppError::InvalidCredentials => ErrorCode::InvalidCredentials,
            AppError::MissingToken => ErrorCode::UnauthorizedMissingToken,
            AppError::MalformedToken => ErrorCode::UnauthorizedMalformedToken,
            AppError::UnsupportedAlgorithm => ErrorCode::UnauthorizedBadAlgorithm,
            AppError::SignatureInvalid => ErrorCode::UnauthorizedBadSignature,
            AppError::TokenExpired => ErrorCode::UnauthorizedExpiredToken,
            AppError::TokenNotYetValid => ErrorCode::UnauthorizedPrematureToken,
            AppError::NotFound { code, .. } => *code,
            AppError::Conflict { code, .. } => *code,
            AppError::Hashing { .. } => ErrorCode::HashingFailure,
            AppError::MalformedHash => ErrorCode::MalformedHash,
            AppError::Signing { .. } => ErrorCode::SigningFailure,
            AppError::Db { .. } => ErrorCode::DbError,
            AppError::DbUnavailable => ErrorCode::DbUnavailable,
            AppError::DbTimeout => ErrorCode::DbTimeout,
            AppError::Internal { .. } => ErrorCode::Internal,
            AppError::Config { .. } => ErrorCode::ConfigError,
        }
    }

    /// True for the token-validation failures that the HTTP boundary
    /// deliberately flattens to a generic unauthorized response. The
    /// specific kind stays visible in logs only, so a forger learns nothing
    /// from the response about which check tripped.
    fn is_flattened_unauthorized(&self) -> bool {
        matches!(
            self,
            AppError::MissingToken
                | AppError::MalformedToken
                | AppError::UnsupportedAlgorithm
                | AppError::SignatureInvalid
                | AppError::TokenExpired
                | AppError::TokenNotYetValid
        )
    }

    /// Code as surfaced to HTTP callers.
    fn public_code(&self) -> ErrorCode {
        if self.is_flattened_unauthorized() {
            ErrorCode::Unauthorized
        } else {
            self.code()
        }
    }

    /// Detail as surfaced to HTTP callers.
    fn public_detail(&self) -> String {
        match self {
            _ if self.is_flattened_unauthorized() => "Authentication required".to_string(),
            AppError::Validation { detail, .. } => detail.clone(),
            AppError::InvalidCredentials => "Invalid email or password".to_string(),
            AppError::NotFound { detail, .. } => detail.clone(),
            AppError::Conflict { detail, .. } => detail.clone(),
            AppError::Hashing { detail } => detail.clone(),
            AppError::MalformedHash => "Stored credential is unreadable".to_string(),
            AppError::Signing { detail } => detail.clone(),
            AppError::Db { detail } => detail.clone(),
            AppError::DbUnavailable => "Database unavailable".to_string(),
            AppError::DbTimeout => "Database timeout".to_string(),
            AppError::Internal { detail } => detail.clone(),
            AppError::Config { detail } => detail.clone(),
            // Flattened variants are handled by the guard arm above.
            _ => "Authentication required".to_string(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::MissingToken
            | AppError::MalformedToken
            | AppError::UnsupportedAlgorithm
            | AppError::SignatureInvalid
            | AppError::TokenExpired
            | AppError::TokenNotYetValid => StatusCode::UNAUTHORIZED,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Hashing { .. }
            | AppError::MalformedHash
            | AppError::Signing { .. }
            | AppError::Db { .. }
            | AppError::Internal { .. }
            | AppError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::DbUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            AppError::DbTimeout => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    pub fn invalid(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Validation {
            code,
            detail: detail.into(),
        }
    }

    pub fn invalid_credentials() -> Self {
        Self::InvalidCredentials
    }

    pub fn missing_token() -> Self {
        Self::MissingToken
    }

    pub fn malformed_token() -> Self {
        Self::MalformedToken
    }

    pub fn unsupported_algorithm() -> Self {
        Self::UnsupportedAlgorithm
    }

    pub fn signature_invalid() -> Self {
        Self::SignatureInvalid
    }

    pub fn token_expired() -> Self {
        Self::TokenExpired
    }

    pub fn token_not_yet_valid() -> Self {
        Self::TokenNotYetValid
    }

    pub fn not_found(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::NotFound {
            code,
            detail: detail.into(),
        }
    }

    pub fn conflict(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Conflict {
            code,
            detail: detail.into(),
        }
    }

    pub fn hashing(detail: impl Into<String>) -> Self {
        Self::Hashing {
            detail: detail.into(),
        }
    }

    pub fn malformed_hash() -> Self {
        Self::MalformedHash
    }

    pub fn signing(detail: impl Into<String>) -> Self {
        Self::Signing {
            detail: detail.into(),
        }
    }

    pub fn db(detail: impl Into<String>) -> Self {
        Self::Db {
            detail: detail.into(),
        }
    }

    pub fn db_unavailable() -> Self {
        Self::DbUnavailable
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    fn humanize_code(code: &str) -> String {
        code.split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    None => String::new(),
                    Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation(detail) => AppError::invalid(ErrorCode::ValidationError, detail),
            DomainError::Conflict(ConflictKind::UniqueEmail, _) => {
                AppError::conflict(ErrorCode::DuplicateEmail, "Email already registered")
            }
            DomainError::Conflict(_, detail) => AppError::conflict(ErrorCode::Conflict, detail),
            DomainError::NotFound(NotFoundKind::User, detail) => {
                AppError::not_found(ErrorCode::UserNotFound, detail)
            }
            DomainError::NotFound(_, detail) => AppError::not_found(ErrorCode::NotFound, detail),
            DomainError::Infra(InfraErrorKind::Timeout, _) => AppError::DbTimeout,
            DomainError::Infra(InfraErrorKind::DbUnavailable, _) => AppError::DbUnavailable,
            DomainError::Infra(_, detail) => AppError::db(detail),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        let trace_id = trace_ctx::trace_id();

        // The flattened 401s lose their specific kind at the boundary; log it
        // here so the sub-kind stays diagnosable from the trace id.
        if self.is_flattened_unauthorized() {
            warn!(trace_id = %trace_id, kind = %self.code(), "authorization rejected");
        }

        let code = self.public_code().as_str().to_string();
        let problem_details = ProblemDetails {
            type_: format!("https://ledgerly.app/errors/{code}"),
            title: Self::humanize_code(&code),
            status: status.as_u16(),
            detail: self.public_detail(),
            code,
            trace_id: trace_id.clone(),
        };

        let mut builder = HttpResponse::build(status);
        builder
            .content_type("application/problem+json")
            .insert_header(("x-trace-id", trace_id));

        if status == StatusCode::UNAUTHORIZED {
            builder.insert_header(("WWW-Authenticate", "Bearer"));
        }
        if status == StatusCode::SERVICE_UNAVAILABLE {
            builder.insert_header(("Retry-After", "5"));
        }

        builder.json(problem_details)
    }
}

#[cfg(test)]
mod tests {
    use actix_web::body::to_bytes;
    use serde_json::Value;

    use super::*;

    async fn body_json(err: AppError) -> (StatusCode, Value) {
        let resp = err.error_response();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[actix_web::test]
    async fn token_failures_flatten_to_generic_unauthorized() {
        for err in [
            AppError::missing_token(),
            AppError::malformed_token(),
            AppError::unsupported_algorithm(),
            AppError::signature_invalid(),
            AppError::token_expired(),
            AppError::token_not_yet_valid(),
        ] {
            let (status, body) = body_json(err).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(body["code"], "UNAUTHORIZED");
            assert_eq!(body["detail"], "Authentication required");
        }
    }

    #[actix_web::test]
    async fn invalid_credentials_keeps_its_code() {
        let (status, body) = body_json(AppError::invalid_credentials()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "INVALID_CREDENTIALS");
        assert_eq!(body["detail"], "Invalid email or password");
    }

    #[actix_web::test]
    async fn unauthorized_carries_www_authenticate() {
        let resp = AppError::missing_token().error_response();
        assert_eq!(
            resp.headers().get("WWW-Authenticate").unwrap(),
            "Bearer"
        );
    }

    #[test]
    fn unique_email_conflict_maps_to_duplicate_email() {
        let domain = DomainError::conflict(ConflictKind::UniqueEmail, "users.email");
        let app = AppError::from(domain);
        assert_eq!(app.code(), ErrorCode::DuplicateEmail);
        assert_eq!(app.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn infra_timeout_is_distinct_from_credential_failures() {
        let app = AppError::from(DomainError::infra(InfraErrorKind::Timeout, "pool"));
        assert_eq!(app.code(), ErrorCode::DbTimeout);
        assert_eq!(app.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn humanize_code_title_cases_words() {
        assert_eq!(AppError::humanize_code("DUPLICATE_EMAIL"), "Duplicate Email");
    }
}
