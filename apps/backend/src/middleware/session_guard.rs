//! Session guard middleware.
//!
//! Gates protected routes behind session-token validation. Per request:
//! extract the token (session cookie first, then `Authorization: Bearer`),
//! verify it through the token codec, and store the resolved identity in
//! request extensions for the `CurrentUser` extractor. Any extraction or
//! validation failure short-circuits into a 401 ProblemDetails response.
//!
//! The guard is read-only: it never touches the store and never mints
//! tokens. The identity context is written exactly once, before the
//! downstream handler runs.

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::error::ResponseError;
use actix_web::http::header;
use actix_web::{web, Error, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture, Ready};

use crate::auth::claims::AuthenticatedUser;
use crate::auth::jwt::verify_access_token;
use crate::auth::SESSION_COOKIE;
use crate::error::AppError;
use crate::state::app_state::AppState;

pub struct SessionGuard;

impl<S, B> Transform<S, ServiceRequest> for SessionGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionGuardMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionGuardMiddleware { service }))
    }
}

pub struct SessionGuardMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for SessionGuardMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match authorize(&req) {
            Ok(identity) => {
                req.extensions_mut().insert(identity);

                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(err) => Box::pin(async move {
                // Built inside the awaited future so the response carries the
                // request's task-local trace id.
                let response = err.error_response().map_into_right_body();
                Ok(req.into_response(response))
            }),
        }
    }
}

/// Run the full extraction + validation pipeline for one request.
fn authorize(req: &ServiceRequest) -> Result<AuthenticatedUser, AppError> {
    let token = extract_token(req)?;

    let app_state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::internal("AppState not available"))?;

    let claims = verify_access_token(&token, &app_state.security)?;

    Ok(AuthenticatedUser {
        id: claims.sub,
        email: claims.email,
    })
}

/// Token lookup order: session cookie first, then `Authorization: Bearer`.
fn extract_token(req: &ServiceRequest) -> Result<String, AppError> {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        let value = cookie.value().to_string();
        if !value.is_empty() {
            return Ok(value);
        }
    }

    bearer_token(req.headers().get(header::AUTHORIZATION))?.ok_or_else(AppError::missing_token)
}

/// Parse "Bearer <token>" out of an Authorization header value.
///
/// `Ok(None)` when the header is absent; an error when it is present but not
/// in Bearer form.
fn bearer_token(header_value: Option<&header::HeaderValue>) -> Result<Option<String>, AppError> {
    let auth_value = match header_value {
        Some(value) => value,
        None => return Ok(None),
    };

    let auth_str = auth_value
        .to_str()
        .map_err(|_| AppError::malformed_token())?;

    let parts: Vec<&str> = auth_str.split_whitespace().collect();
    if parts.len() != 2 || parts[0] != "Bearer" || parts[1].is_empty() {
        return Err(AppError::malformed_token());
    }

    Ok(Some(parts[1].to_string()))
}

#[cfg(test)]
mod tests {
    use actix_web::cookie::Cookie;
    use actix_web::http::header::HeaderValue;
    use actix_web::test::TestRequest;

    use super::*;

    #[test]
    fn bearer_token_parses_well_formed_header() {
        let value = HeaderValue::from_static("Bearer abc123");
        assert_eq!(bearer_token(Some(&value)).unwrap(), Some("abc123".to_string()));
    }

    #[test]
    fn bearer_token_absent_header_is_none() {
        assert_eq!(bearer_token(None).unwrap(), None);
    }

    #[test]
    fn bearer_token_rejects_other_schemes_and_empty_tokens() {
        for raw in ["Token abc", "Bearer", "Bearer  ", "abc"] {
            let value = HeaderValue::from_static(raw);
            assert!(
                matches!(bearer_token(Some(&value)), Err(AppError::MalformedToken)),
                "{raw:?}"
            );
        }
    }

    #[test]
    fn extract_token_prefers_cookie_over_header() {
        let req = TestRequest::default()
            .cookie(Cookie::new(SESSION_COOKIE, "from-cookie"))
            .insert_header((header::AUTHORIZATION, "Bearer from-header"))
            .to_srv_request();

        assert_eq!(extract_token(&req).unwrap(), "from-cookie");
    }

    #[test]
    fn extract_token_falls_back_to_bearer_header() {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer from-header"))
            .to_srv_request();

        assert_eq!(extract_token(&req).unwrap(), "from-header");
    }

    #[test]
    fn extract_token_missing_everywhere() {
        let req = TestRequest::default().to_srv_request();
        assert!(matches!(
            extract_token(&req),
            Err(AppError::MissingToken)
        ));
    }
}
