use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Authenticated Router Module
///
/// Defines the routes reachable only with a valid session: the admin dashboard
/// and the full post-management lifecycle.
///
/// Access Control Strategy:
/// Every handler in this module relies on the `AuthSession` extractor middleware
/// being layered on this router in `create_router`. A request without a valid
/// session cookie is redirected to /login (with a flash warning) before any
/// handler here runs; handlers additionally take `AuthSession` as an argument
/// so the guarantee is visible in their signatures.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /dashboard
        // The admin listing with edit and delete controls.
        .route("/dashboard", get(handlers::dashboard))
        // GET+POST /add
        // Post authoring: empty form on GET, validate-and-create on POST.
        .route("/add", get(handlers::add_page).post(handlers::add_submit))
        // GET+POST /edit/{id}
        // Pre-populated form on GET; overwrites the four mutable fields on POST.
        .route(
            "/edit/{id}",
            get(handlers::edit_page).post(handlers::edit_submit),
        )
        // GET+POST /delete/{id}/
        // Unconditional removal. Both methods are accepted, so a bare link visit
        // deletes data — kept deliberately, see DESIGN notes.
        .route(
            "/delete/{id}/",
            get(handlers::delete_post).post(handlers::delete_post),
        )
        // GET /logout
        // Clears the session cookie and returns to the login page.
        .route("/logout", get(handlers::logout))
}
