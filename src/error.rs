use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// AppError
///
/// The application-wide failure taxonomy. Every repository operation returns
/// `Result<_, AppError>` so that handlers never have to interpret raw driver errors.
///
/// Validation failures are deliberately *not* part of this enum: a rejected form is
/// re-rendered with its field messages by the handler itself and never becomes an
/// HTTP error. Missing-session failures are likewise handled by the auth gate's
/// redirect rejection, not here.
#[derive(Debug)]
pub enum AppError {
    /// A lookup by id or username matched no row where exactly one was expected.
    NotFound,
    /// A row insert violated the admins.username UNIQUE constraint.
    UsernameTaken,
    /// Any other persistence-layer failure. Propagates as a failed request.
    Database(sqlx::Error),
    /// Password hashing or session signing failed.
    Internal(String),
}

impl From<sqlx::Error> for AppError {
    /// Maps driver errors onto the taxonomy. `RowNotFound` becomes `NotFound`;
    /// a unique-constraint violation becomes `UsernameTaken`; everything else is
    /// carried through as `Database`.
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound,
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::UsernameTaken
            }
            other => AppError::Database(other),
        }
    }
}

/// Convert failures to HTTP responses.
///
/// No graceful error pages exist in this application: a NotFound is a plain 404
/// and everything else is a plain 500 with the detail kept server-side in the logs.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "Not Found").into_response(),
            // Should be intercepted by the register handler and re-presented as a
            // form error; reaching here means a non-form caller hit the constraint.
            AppError::UsernameTaken => {
                (StatusCode::CONFLICT, "Username already registered").into_response()
            }
            AppError::Database(err) => {
                tracing::error!("database error: {:?}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
            AppError::Internal(msg) => {
                tracing::error!("internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}
