use actix_web::web;

pub mod health;
pub mod rooms;

/// Register every application route.
///
/// `main.rs` wraps the app in request tracing; tests mount this directly.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check: /health
    cfg.service(web::scope("/health").configure(health::configure_routes));

    // Rooms: /api/rooms/**
    cfg.service(web::scope("/api/rooms").configure(rooms::configure_routes));
}
