use crate::error::AppError;
use crate::models::{Admin, Post, PostForm, RegisterForm};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Repository Trait
///
/// Defines the abstract contract for all persistence operations. This is the core
/// of the Repository Abstraction pattern, allowing the handlers to interact with
/// the data layer without knowing the specific implementation (SQLite, Mock, etc.).
///
/// Every operation returns a `Result` with a typed failure: transaction boundaries
/// are explicit and single-row, and a lookup that matches no row is surfaced as
/// `AppError::NotFound` rather than an empty collection or a panic.
///
/// **Send + Sync + async_trait** are required to make the trait object (`Arc<dyn Repository>`)
/// safely shareable and usable across Axum's asynchronous task boundaries.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Post Retrieval ---
    // Public listing, newest first by date_posted.
    async fn list_posts(&self) -> Result<Vec<Post>, AppError>;
    // Exactly-one lookup by id. NotFound if the row is absent.
    async fn get_post(&self, id: i64) -> Result<Post, AppError>;

    // --- Post Actions ---
    // Inserts a new row; date_posted is stamped with "now" at insert time.
    async fn create_post(&self, form: &PostForm) -> Result<Post, AppError>;
    // Overwrites the four mutable fields in place. NotFound if the row is absent.
    async fn update_post(&self, id: i64, form: &PostForm) -> Result<Post, AppError>;
    // Unconditional removal. NotFound if the row is absent.
    async fn delete_post(&self, id: i64) -> Result<(), AppError>;

    // --- Admin ---
    // Inserts a new admin with an already-hashed password. UsernameTaken on a
    // duplicate username.
    async fn create_admin(&self, form: &RegisterForm, password_hash: &str)
        -> Result<Admin, AppError>;
    // Exactly-one lookup by username, used by the login flow.
    async fn find_admin_by_username(&self, username: &str) -> Result<Admin, AppError>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer access across the application state.
pub type RepositoryState = Arc<dyn Repository>;

/// SqliteRepository
///
/// The concrete implementation of the `Repository` trait, backed by the file-backed
/// SQLite database.
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for SqliteRepository {
    /// list_posts
    ///
    /// Retrieves every post, ordered by `date_posted` descending. The `id` tiebreak
    /// keeps the sequence stable when several posts share a timestamp, so repeated
    /// listings with no intervening writes return the same order.
    async fn list_posts(&self) -> Result<Vec<Post>, AppError> {
        let posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, subtitle, author, date_posted, content
            FROM posts
            ORDER BY date_posted DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(posts)
    }

    /// get_post
    ///
    /// Exactly-one retrieval by id. `fetch_one` maps an absent row onto
    /// `AppError::NotFound` through the driver's `RowNotFound`.
    async fn get_post(&self, id: i64) -> Result<Post, AppError> {
        let post = sqlx::query_as::<_, Post>(
            "SELECT id, title, subtitle, author, date_posted, content FROM posts WHERE id = ?",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(post)
    }

    /// create_post
    ///
    /// Inserts a new post. `date_posted` is set to the current UTC time here, at the
    /// single write site, so every persisted post carries a creation timestamp.
    async fn create_post(&self, form: &PostForm) -> Result<Post, AppError> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (title, subtitle, author, date_posted, content)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, title, subtitle, author, date_posted, content
            "#,
        )
        .bind(&form.title)
        .bind(&form.subtitle)
        .bind(&form.author)
        .bind(Utc::now())
        .bind(&form.content)
        .fetch_one(&self.pool)
        .await?;
        Ok(post)
    }

    /// update_post
    ///
    /// Overwrites the four mutable fields of an existing post in place.
    /// `date_posted` is immutable after creation and deliberately not touched.
    async fn update_post(&self, id: i64, form: &PostForm) -> Result<Post, AppError> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET title = ?, subtitle = ?, author = ?, content = ?
            WHERE id = ?
            RETURNING id, title, subtitle, author, date_posted, content
            "#,
        )
        .bind(&form.title)
        .bind(&form.subtitle)
        .bind(&form.author)
        .bind(&form.content)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound)?;
        Ok(post)
    }

    /// delete_post
    ///
    /// Removes a post unconditionally. A zero-row delete means the id never existed
    /// (or was already removed) and is reported as NotFound; no other rows are touched.
    async fn delete_post(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    /// create_admin
    ///
    /// Inserts a new admin row. The caller supplies the bcrypt digest; plaintext
    /// never reaches this layer. A duplicate username trips the UNIQUE constraint,
    /// which the error mapping surfaces as `UsernameTaken`.
    async fn create_admin(
        &self,
        form: &RegisterForm,
        password_hash: &str,
    ) -> Result<Admin, AppError> {
        let admin = sqlx::query_as::<_, Admin>(
            r#"
            INSERT INTO admins (name, username, email, password)
            VALUES (?, ?, ?, ?)
            RETURNING id, name, username, email, password
            "#,
        )
        .bind(&form.name)
        .bind(&form.username)
        .bind(&form.email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(admin)
    }

    /// find_admin_by_username
    ///
    /// Exactly-one lookup by the login key. Zero rows propagates as NotFound —
    /// the login flow is not tolerant of a missing account, matching the
    /// exactly-one contract. More than one match cannot occur under the
    /// UNIQUE constraint.
    async fn find_admin_by_username(&self, username: &str) -> Result<Admin, AppError> {
        let admin = sqlx::query_as::<_, Admin>(
            "SELECT id, name, username, email, password FROM admins WHERE username = ?",
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await?;
        Ok(admin)
    }
}
