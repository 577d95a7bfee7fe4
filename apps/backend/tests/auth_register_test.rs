mod common;
mod support;

use actix_web::http::header;
use actix_web::test;
use backend::state::security_config::SecurityConfig;
use backend_test_support::unique_helpers::unique_email;
use common::assert_problem_details_structure;
use support::create_test_app;
use support::factory;
use support::test_state::build_test_state;

const TEST_SECRET: &[u8] = b"test_secret_key_for_testing_purposes_only";

#[actix_web::test]
async fn register_creates_user_sets_cookie_and_returns_token(
) -> Result<(), Box<dyn std::error::Error>> {
    let security = SecurityConfig::new(TEST_SECRET);
    let state = build_test_state(security.clone()).await?;
    let app = create_test_app(state).build().await?;

    let email = unique_email("register").to_ascii_lowercase();
    let resp = factory::register(&app, &email, "secret-password").await;

    assert_eq!(resp.status().as_u16(), 201);

    // Session cookie present, HttpOnly, scoped to /
    let set_cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .expect("register should set the session cookie")
        .to_str()?
        .to_string();
    assert!(set_cookie.starts_with("auth_token="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("Path=/"));

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["email"], email.as_str());
    assert!(
        body["user"].get("password_hash").is_none(),
        "password hash must never be serialized"
    );

    // The returned token verifies and is bound to the new user
    let token = body["token"].as_str().unwrap();
    let claims = backend::verify_access_token(token, &security)?;
    assert_eq!(claims.email, email);
    assert_eq!(claims.sub.to_string(), body["user"]["id"].as_str().unwrap());

    Ok(())
}

#[actix_web::test]
async fn duplicate_email_registration_conflicts() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state(SecurityConfig::new(TEST_SECRET)).await?;
    let app = create_test_app(state).build().await?;

    let email = unique_email("dup").to_ascii_lowercase();
    let first = factory::register(&app, &email, "secret-password").await;
    assert_eq!(first.status().as_u16(), 201);

    let second = factory::register(&app, &email, "other-password").await;
    assert_problem_details_structure(second, 409, "DUPLICATE_EMAIL", "Email already registered")
        .await;

    Ok(())
}

#[actix_web::test]
async fn duplicate_check_is_case_insensitive() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state(SecurityConfig::new(TEST_SECRET)).await?;
    let app = create_test_app(state).build().await?;

    let email = unique_email("case").to_ascii_lowercase();
    let first = factory::register(&app, &email, "secret-password").await;
    assert_eq!(first.status().as_u16(), 201);

    let second = factory::register(&app, &email.to_ascii_uppercase(), "secret-password").await;
    assert_problem_details_structure(second, 409, "DUPLICATE_EMAIL", "Email already registered")
        .await;

    Ok(())
}

#[actix_web::test]
async fn register_rejects_malformed_email() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state(SecurityConfig::new(TEST_SECRET)).await?;
    let app = create_test_app(state).build().await?;

    let resp = factory::register(&app, "not-an-email", "secret-password").await;
    assert_problem_details_structure(resp, 400, "INVALID_EMAIL", "A valid email address is required")
        .await;

    Ok(())
}

#[actix_web::test]
async fn register_rejects_short_password() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state(SecurityConfig::new(TEST_SECRET)).await?;
    let app = create_test_app(state).build().await?;

    let email = unique_email("shortpw").to_ascii_lowercase();
    let resp = factory::register(&app, &email, "short").await;
    assert_problem_details_structure(
        resp,
        400,
        "INVALID_PASSWORD",
        "Password must be at least 8 characters",
    )
    .await;

    Ok(())
}
