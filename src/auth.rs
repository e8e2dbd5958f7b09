use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{config::AppConfig, error::AppError};

/// Name of the signed session cookie.
pub const SESSION_COOKIE: &str = "session";
/// Name of the one-shot flash cookie carrying the auth-gate warning.
pub const FLASH_COOKIE: &str = "flash";

/// SessionClaims
///
/// The payload signed into the session cookie. It is the entire server-side notion
/// of "who is logged in": a boolean marker plus the username, HMAC-signed with the
/// configured secret so a client cannot forge or alter it.
///
/// There is deliberately no expiry claim — sessions last until logout clears the
/// cookie or the browser drops it.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (sub): the username stored at login time.
    pub sub: String,
    /// The session marker distinguishing authenticated from anonymous requests.
    pub logged_in: bool,
    /// Issued At (iat): timestamp when the session started.
    pub iat: i64,
}

/// issue_session
///
/// Signs a fresh session token for the given username. Called once, by the login
/// handler, after the password check has passed.
pub fn issue_session(username: &str, secret: &str) -> Result<String, AppError> {
    let claims = SessionClaims {
        sub: username.to_string(),
        logged_in: true,
        iat: chrono::Utc::now().timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("session signing failed: {e}")))
}

/// verify_session
///
/// Decodes and signature-checks a session token. Expiry validation is switched off:
/// these sessions carry no `exp` claim by design.
pub fn verify_session(token: &str, secret: &str) -> Option<SessionClaims> {
    let mut validation = Validation::default();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    let data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .ok()?;
    // A token without the marker set is treated the same as no token at all.
    data.claims.logged_in.then_some(data.claims)
}

/// hash_password
///
/// Derives the salted one-way digest stored in the admins table. bcrypt generates
/// its own per-hash salt, so two admins with the same password get distinct digests.
pub fn hash_password(plain: &str) -> Result<String, AppError> {
    bcrypt::hash(plain, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))
}

/// verify_password
///
/// One-way comparison: the candidate is hashed and compared against the stored
/// digest, never the reverse. Any bcrypt error counts as a mismatch.
pub fn verify_password(candidate: &str, stored_hash: &str) -> bool {
    bcrypt::verify(candidate, stored_hash).unwrap_or(false)
}

/// session_from_jar
///
/// Peeks at the session cookie without enforcing it. Public pages use this to
/// decide which navigation links to render; protected pages go through the
/// `AuthSession` extractor instead.
pub fn session_from_jar(jar: &CookieJar, secret: &str) -> Option<SessionClaims> {
    let token = jar.get(SESSION_COOKIE)?.value();
    verify_session(token, secret)
}

/// AuthSession Extractor Result
///
/// The resolved identity of an authenticated request: the username that the login
/// handler signed into the session cookie. Handlers take this as an argument to
/// declare themselves protected.
#[derive(Debug, Clone)]
pub struct AuthSession {
    /// The username stored at login time. Any logged-in session can act on any
    /// post; there is no per-user scoping.
    pub username: String,
}

/// AuthRedirect
///
/// The rejection produced when a protected route is hit without a valid session.
/// Not a hard failure: the visitor is bounced to the login page, and a one-shot
/// flash cookie carries the warning the login page displays.
#[derive(Debug)]
pub struct AuthRedirect;

impl IntoResponse for AuthRedirect {
    fn into_response(self) -> Response {
        let flash = Cookie::build((FLASH_COOKIE, "Unauthorized, Please Login"))
            .path("/")
            .build();
        (CookieJar::new().add(flash), Redirect::to("/login")).into_response()
    }
}

/// AuthSession Extractor Implementation
///
/// Implements Axum's FromRequestParts trait, making AuthSession usable as a function
/// argument in any protected handler. This cleanly separates the capability check
/// (extractor/middleware) from business logic (the handler).
///
/// The process is pure session-state inspection:
/// 1. Read the session cookie from the request headers.
/// 2. Verify its signature and the logged-in marker against the configured secret.
///
/// Rejection: redirects to /login with a flash warning on any failure.
impl<S> FromRequestParts<S> for AuthSession
where
    S: Send + Sync,
    // Allows the extractor to pull the AppConfig (for the session secret).
    AppConfig: FromRef<S>,
{
    type Rejection = AuthRedirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AppConfig::from_ref(state);

        let jar = CookieJar::from_headers(&parts.headers);
        let claims = session_from_jar(&jar, &config.session_secret).ok_or(AuthRedirect)?;

        Ok(AuthSession {
            username: claims.sub,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_round_trip_preserves_username() {
        let token = issue_session("admin1", "test-secret").expect("signing should succeed");
        let claims = verify_session(&token, "test-secret").expect("token should verify");
        assert_eq!(claims.sub, "admin1");
        assert!(claims.logged_in);
    }

    #[test]
    fn session_rejects_wrong_secret() {
        let token = issue_session("admin1", "test-secret").expect("signing should succeed");
        assert!(verify_session(&token, "other-secret").is_none());
    }

    #[test]
    fn password_verify_is_one_way() {
        let hash = hash_password("p1").expect("hashing should succeed");
        // The digest never equals the plaintext, and only the original verifies.
        assert_ne!(hash, "p1");
        assert!(verify_password("p1", &hash));
        assert!(!verify_password("p2", &hash));
    }
}
