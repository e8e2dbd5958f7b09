use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

// --- Core Application Schemas (Mapped to Database) ---

/// Post
///
/// A blog article record from the `posts` table. This is the primary data
/// structure for the core business logic.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Default)]
pub struct Post {
    // Primary Key (SQLite rowid). Unique, system-generated, immutable.
    pub id: i64,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    // Set once at creation; listing orders by this, newest first.
    pub date_posted: DateTime<Utc>,
    pub content: String,
}

/// Admin
///
/// The single-role account type permitted to manage posts, from the `admins` table.
/// The `password` column only ever holds a salted bcrypt digest, never plaintext.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Default)]
pub struct Admin {
    pub id: i64,
    pub name: String,
    // Login lookup key. UNIQUE at the schema level so the lookup yields at most one row.
    pub username: String,
    pub email: String,
    // Salted one-way hash of the registration password.
    pub password: String,
}

/// --- Form Payloads (Input Schemas) ---

/// PostForm
///
/// Input payload for the post-authoring form (POST /add and POST /edit/{id}).
/// The length bounds mirror the authoring contract: short titles and a minimum
/// article length of 300 characters, with no upper bound on content.
///
/// On validation failure the handler re-renders the same form with the entered
/// text and the field-level messages collected by `validate()`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct PostForm {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 200, message = "Subtitle must be 1-200 characters"))]
    pub subtitle: String,

    #[validate(length(min = 1, max = 100, message = "Author must be 1-100 characters"))]
    pub author: String,

    #[validate(length(min = 300, message = "Content must be at least 300 characters"))]
    pub content: String,
}

/// RegisterForm
///
/// Input payload for the public admin-registration form (POST /register).
///
/// Note: email is only checked for length, not format — any string in range passes.
/// The plaintext password lives only in this transient form value; it is hashed
/// before anything is persisted.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct RegisterForm {
    #[validate(length(min = 1, max = 30, message = "Name must be 1-30 characters"))]
    pub name: String,

    #[validate(length(min = 4, max = 25, message = "Username must be 4-25 characters"))]
    pub username: String,

    #[validate(length(min = 6, max = 50, message = "Email must be 6-50 characters"))]
    pub email: String,

    #[validate(
        length(min = 1, message = "Password is required"),
        must_match(other = "confirm", message = "Passwords do not match")
    )]
    pub password: String,

    pub confirm: String,
}

/// LoginForm
///
/// Credentials submitted to POST /login. Not validated beyond presence: a mismatch
/// of any kind surfaces as the generic "Invalid Login" message.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}
