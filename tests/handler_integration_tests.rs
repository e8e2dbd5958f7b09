use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use inkpot::{
    AppConfig, AppState, create_router,
    repository::{RepositoryState, SqliteRepository},
};
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use std::sync::Arc;
use tower::ServiceExt;

// --- Test Context and Setup ---

/// Holds the assembled router plus a handle on the underlying pool so tests can
/// assert directly against the database.
struct TestApp {
    router: Router,
    pool: SqlitePool,
}

impl TestApp {
    /// Builds the full application against a fresh in-memory SQLite database.
    /// One connection only: each in-memory connection is its own database.
    async fn spawn() -> Self {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to open in-memory SQLite for handler tests.");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run database migrations.");

        let repo = Arc::new(SqliteRepository::new(pool.clone())) as RepositoryState;
        let state = AppState {
            repo,
            config: AppConfig::default(),
        };

        TestApp {
            router: create_router(state),
            pool,
        }
    }

    async fn get(&self, path: &str, session_cookie: Option<&str>) -> Response {
        let mut builder = Request::builder().method("GET").uri(path);
        if let Some(cookie) = session_cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.router
            .clone()
            .oneshot(builder.body(Body::empty()).expect("request build failed"))
            .await
            .expect("request failed")
    }

    async fn post_form(&self, path: &str, body: &str, session_cookie: Option<&str>) -> Response {
        let mut builder = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = session_cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.router
            .clone()
            .oneshot(
                builder
                    .body(Body::from(body.to_string()))
                    .expect("request build failed"),
            )
            .await
            .expect("request failed")
    }

    async fn post_count(&self) -> i64 {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.pool)
            .await
            .expect("count query failed")
    }

    async fn admin_count(&self) -> i64 {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM admins")
            .fetch_one(&self.pool)
            .await
            .expect("count query failed")
    }

    /// Registers and logs in the default test admin, returning the session
    /// cookie pair ("session=...") for use on protected requests.
    async fn login(&self) -> String {
        let register = self
            .post_form(
                "/register",
                "name=A&username=admin1&email=a@a.com&password=p1&confirm=p1",
                None,
            )
            .await;
        assert_eq!(register.status(), StatusCode::SEE_OTHER);

        let login = self
            .post_form("/login", "username=admin1&password=p1", None)
            .await;
        assert_eq!(login.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&login), "/dashboard");
        session_cookie(&login).expect("login should set the session cookie")
    }
}

// --- Response Helpers ---

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("redirect should carry a Location header")
        .to_str()
        .expect("Location should be valid UTF-8")
}

/// Extracts the "name=value" pair of the named cookie from Set-Cookie, if present.
fn cookie_pair(response: &Response, name: &str) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
        .find(|pair| pair.starts_with(&format!("{name}=")))
}

fn session_cookie(response: &Response) -> Option<String> {
    cookie_pair(response, "session")
}

async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body read failed");
    String::from_utf8(bytes.to_vec()).expect("body should be UTF-8")
}

const VALID_POST_BODY: &str = "title=T&subtitle=S&author=Au&content=cccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccc";

// --- Tests ---

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::spawn().await;
    let response = app.get("/health", None).await;
    assert!(response.status().is_success());
}

#[tokio::test]
async fn test_public_pages_render() {
    let app = TestApp::spawn().await;
    for path in ["/", "/about", "/contact", "/register", "/login"] {
        let response = app.get(path, None).await;
        assert_eq!(response.status(), StatusCode::OK, "GET {path} should render");
    }
}

#[tokio::test]
async fn test_protected_routes_redirect_anonymous_to_login() {
    let app = TestApp::spawn().await;

    for path in ["/dashboard", "/add", "/edit/1", "/delete/1/", "/logout"] {
        let response = app.get(path, None).await;
        assert_eq!(
            response.status(),
            StatusCode::SEE_OTHER,
            "GET {path} should bounce anonymous visitors"
        );
        assert_eq!(location(&response), "/login");
        // The auth gate leaves a flash warning for the login page to show.
        assert!(cookie_pair(&response, "flash").is_some());
    }
}

#[tokio::test]
async fn test_unauthenticated_add_creates_nothing() {
    let app = TestApp::spawn().await;

    let response = app.post_form("/add", VALID_POST_BODY, None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
    assert_eq!(app.post_count().await, 0, "No post may be created without a session");
}

#[tokio::test]
async fn test_register_then_login_authenticates_the_session() {
    let app = TestApp::spawn().await;
    let cookie = app.login().await;
    assert_eq!(app.admin_count().await, 1);

    // The session now opens the protected dashboard.
    let dashboard = app.get("/dashboard", Some(&cookie)).await;
    assert_eq!(dashboard.status(), StatusCode::OK);
    let body = body_string(dashboard).await;
    assert!(body.contains("admin1"), "Dashboard should greet the logged-in admin");
}

#[tokio::test]
async fn test_login_with_wrong_password_stays_anonymous() {
    let app = TestApp::spawn().await;
    app.login().await;

    let response = app
        .post_form("/login", "username=admin1&password=wrong", None)
        .await;
    // The login form is re-rendered with the generic message; no session cookie.
    assert_eq!(response.status(), StatusCode::OK);
    assert!(session_cookie(&response).is_none());
    let body = body_string(response).await;
    assert!(body.contains("Invalid Login"));

    // And the unauthenticated browser is still locked out.
    let dashboard = app.get("/dashboard", None).await;
    assert_eq!(dashboard.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_register_rejects_password_mismatch() {
    let app = TestApp::spawn().await;

    let response = app
        .post_form(
            "/register",
            "name=A&username=admin1&email=a@a.com&password=p1&confirm=p2",
            None,
        )
        .await;
    // Form re-presented with errors; nothing persisted.
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.admin_count().await, 0);
    let body = body_string(response).await;
    assert!(body.contains("Passwords do not match"));
}

#[tokio::test]
async fn test_register_rejects_duplicate_username() {
    let app = TestApp::spawn().await;
    app.login().await;

    let response = app
        .post_form(
            "/register",
            "name=B&username=admin1&email=b@b.com&password=p2&confirm=p2",
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.admin_count().await, 1, "The duplicate must not be persisted");
    let body = body_string(response).await;
    assert!(body.contains("Username already registered"));
}

#[tokio::test]
async fn test_post_lifecycle_via_handlers() {
    let app = TestApp::spawn().await;
    let cookie = app.login().await;

    // Create
    let created = app.post_form("/add", VALID_POST_BODY, Some(&cookie)).await;
    assert_eq!(created.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&created), "/");
    assert_eq!(app.post_count().await, 1);

    let post_id = sqlx::query_scalar::<_, i64>("SELECT id FROM posts")
        .fetch_one(&app.pool)
        .await
        .expect("id query failed");

    // Public detail page renders the new post.
    let detail = app.get(&format!("/post/{post_id}/"), None).await;
    assert_eq!(detail.status(), StatusCode::OK);
    assert!(body_string(detail).await.contains("T"));

    // Edit: the pre-populated form, then an overwrite.
    let edit_form = app.get(&format!("/edit/{post_id}"), Some(&cookie)).await;
    assert_eq!(edit_form.status(), StatusCode::OK);

    let edited_body = VALID_POST_BODY.replace("title=T", "title=Edited");
    let edited = app
        .post_form(&format!("/edit/{post_id}"), &edited_body, Some(&cookie))
        .await;
    assert_eq!(edited.status(), StatusCode::SEE_OTHER);

    let index = body_string(app.get("/", None).await).await;
    assert!(index.contains("Edited"));

    // Delete via bare GET, then the detail page is gone.
    let deleted = app.get(&format!("/delete/{post_id}/"), Some(&cookie)).await;
    assert_eq!(deleted.status(), StatusCode::SEE_OTHER);
    assert_eq!(app.post_count().await, 0);

    let gone = app.get(&format!("/post/{post_id}/"), None).await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_short_content_is_rejected_without_persisting() {
    let app = TestApp::spawn().await;
    let cookie = app.login().await;

    let short_body = "title=T&subtitle=S&author=Au&content=short";
    let response = app.post_form("/add", short_body, Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.post_count().await, 0);
    let body = body_string(response).await;
    assert!(body.contains("Content must be at least 300 characters"));
    // The entered text is preserved in the re-rendered form.
    assert!(body.contains("short"));
}

#[tokio::test]
async fn test_listing_is_idempotent_without_writes() {
    let app = TestApp::spawn().await;
    let cookie = app.login().await;

    app.post_form("/add", VALID_POST_BODY, Some(&cookie)).await;
    let second_body = VALID_POST_BODY.replace("title=T", "title=Second");
    app.post_form("/add", &second_body, Some(&cookie)).await;

    let first_render = body_string(app.get("/", None).await).await;
    let second_render = body_string(app.get("/", None).await).await;
    assert_eq!(first_render, second_render);
}

#[tokio::test]
async fn test_delete_nonexistent_id_is_not_found() {
    let app = TestApp::spawn().await;
    let cookie = app.login().await;

    app.post_form("/add", VALID_POST_BODY, Some(&cookie)).await;

    let response = app.get("/delete/9999/", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.post_count().await, 1, "No other rows may be affected");
}

#[tokio::test]
async fn test_logout_ends_the_session() {
    let app = TestApp::spawn().await;
    let cookie = app.login().await;

    let response = app.get("/logout", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
    // The session cookie is cleared (re-set to an empty value for removal).
    let cleared = session_cookie(&response).expect("logout should reset the cookie");
    assert_eq!(cleared, "session=");
}

#[tokio::test]
async fn test_flash_warning_shows_once_on_login_page() {
    let app = TestApp::spawn().await;

    let bounced = app.get("/dashboard", None).await;
    let flash = cookie_pair(&bounced, "flash").expect("bounce should set the flash cookie");

    let login_page = app.get("/login", Some(&flash)).await;
    // The page shows the warning and clears the cookie.
    assert!(cookie_pair(&login_page, "flash").is_some());
    let body = body_string(login_page).await;
    assert!(body.contains("Unauthorized, Please Login"));

    // Without the cookie the warning is gone.
    let plain = body_string(app.get("/login", None).await).await;
    assert!(!plain.contains("Unauthorized, Please Login"));
}
