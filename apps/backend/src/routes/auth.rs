use std::time::SystemTime;

use actix_web::cookie::{Cookie, SameSite};
use actix_web::{web, HttpResponse};
use lazy_regex::regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::jwt::mint_access_token;
use crate::auth::SESSION_COOKIE;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::current_user::CurrentUser;
use crate::infra::db::require_db;
use crate::middleware::session_guard::SessionGuard;
use crate::repos::users::{self, User};
use crate::services::auth as auth_service;
use crate::state::app_state::AppState;

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// User record as returned to clients. The password hash never leaves the
/// service, so it has no field here.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
}

fn validate_credentials(email: &str, password: &str) -> Result<(), AppError> {
    let email_shape = regex!(r"^[^@\s]+@[^@\s]+\.[^@\s]+$");
    if !email_shape.is_match(email.trim()) {
        return Err(AppError::invalid(
            ErrorCode::InvalidEmail,
            "A valid email address is required",
        ));
    }

    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::invalid(
            ErrorCode::InvalidPassword,
            format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }

    Ok(())
}

fn session_cookie(token: &str, max_age: std::time::Duration) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token.to_string())
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::seconds(max_age.as_secs() as i64))
        .finish()
}

/// Cookie that instructs the client to drop the session: empty value,
/// zero max-age, expiry in the past.
fn cleared_session_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, "")
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::ZERO)
        .expires(OffsetDateTime::UNIX_EPOCH)
        .finish()
}

/// Create an account and open a session for it in one step.
async fn register(
    req: web::Json<RegisterRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    validate_credentials(&req.email, &req.password)?;

    let db = require_db(&app_state)?;
    let user = auth_service::register_user(db, &req.email, &req.password).await?;

    let token = mint_access_token(user.id, &user.email, SystemTime::now(), &app_state.security)?;

    Ok(HttpResponse::Created()
        .cookie(session_cookie(&token, app_state.security.token_ttl))
        .json(AuthResponse {
            user: user.into(),
            token,
        }))
}

async fn login(
    req: web::Json<LoginRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    validate_credentials(&req.email, &req.password)?;

    let db = require_db(&app_state)?;
    let user = auth_service::authenticate_user(db, &req.email, &req.password).await?;

    let token = mint_access_token(user.id, &user.email, SystemTime::now(), &app_state.security)?;

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(&token, app_state.security.token_ttl))
        .json(AuthResponse {
            user: user.into(),
            token,
        }))
}

/// Stateless logout. There is no server-side session to clear, so this only
/// instructs the client to drop the cookie; an already-issued token stays
/// valid until its natural expiry.
async fn logout() -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok()
        .cookie(cleared_session_cookie())
        .json(json!({ "message": "Logged out" })))
}

/// Return the authenticated caller's user record.
async fn me(
    auth: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;

    let user = users::find_by_id(db, auth.id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::not_found(ErrorCode::UserNotFound, "User not found"))?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/register").route(web::post().to(register)))
        .service(web::resource("/login").route(web::post().to(login)))
        .service(web::resource("/logout").route(web::post().to(logout)))
        .service(
            web::resource("/me")
                .wrap(SessionGuard)
                .route(web::get().to(me)),
        );
}
