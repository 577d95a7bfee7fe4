//! Request helpers shared across auth test binaries.

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, Error};
use serde_json::json;

/// POST /api/auth/register with the given credentials
pub async fn register(
    app: &impl Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
    email: &str,
    password: &str,
) -> ServiceResponse<BoxBody> {
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    test::call_service(app, req).await
}

/// POST /api/auth/login with the given credentials
pub async fn login(
    app: &impl Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
    email: &str,
    password: &str,
) -> ServiceResponse<BoxBody> {
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    test::call_service(app, req).await
}
