/// Router Module Index
///
/// Organizes the application's routing logic into access-segregated modules.
/// Access control is applied explicitly at the module level (via an Axum route
/// layer), so a protected page can never be exposed by forgetting a guard in
/// its handler.
///
/// The two modules map directly to the two session states.

/// Routes accessible to all visitors (anonymous, read-only plus the
/// register/login gateway).
pub mod public;

/// Routes protected by the `AuthSession` extractor middleware.
/// Requires a valid signed session cookie.
pub mod authenticated;
