use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Public Router Module
///
/// Defines endpoints that are **unauthenticated** and accessible to any visitor
/// (anonymous or logged-in). These routes handle the read-only blog surface and
/// the account gateway (register/login).
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // A simple, unauthenticated endpoint used for monitoring and load balancer checks.
        // Returns "ok" immediately to verify the service is running and responsive.
        .route("/health", get(|| async { "ok" }))
        // GET /
        // The front page: all posts, newest first.
        .route("/", get(handlers::index))
        // GET /about, GET /contact
        // Static info pages.
        .route("/about", get(handlers::about))
        .route("/contact", get(handlers::contact))
        // GET /post/{id}/
        // Detailed view of a single post. An absent id is a plain NotFound.
        .route("/post/{id}/", get(handlers::show_post))
        // GET+POST /register
        // Admin self-registration: empty form on GET, validate-hash-create on POST.
        .route(
            "/register",
            get(handlers::register_page).post(handlers::register_submit),
        )
        // GET+POST /login
        // The session gateway. GET renders the form (and any flash warning the
        // auth gate left behind); POST performs the credential check.
        .route(
            "/login",
            get(handlers::login_page).post(handlers::login_submit),
        )
}
