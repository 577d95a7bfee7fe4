use actix_web::web;

pub mod auth;
pub mod health;

/// Configure application routes. Shared by `main.rs` and the test harness so
/// both exercise identical paths and guards.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check routes: /health
    cfg.service(web::scope("/health").configure(health::configure_routes));

    // Auth routes: /api/auth/**
    cfg.service(web::scope("/api/auth").configure(auth::configure_routes));
}
