use crate::{
    AppState,
    auth::{self, AuthSession, FLASH_COOKIE, SESSION_COOKIE},
    error::AppError,
    models::{LoginForm, PostForm, RegisterForm},
    views,
};
use axum::{
    extract::{Form, Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use maud::Markup;
use validator::Validate;

/// Resolves whether the request carries a valid session, for navigation purposes
/// only. Public handlers render slightly different chrome for a logged-in admin,
/// but never gate data on it.
fn nav_logged_in(jar: &CookieJar, state: &AppState) -> bool {
    auth::session_from_jar(jar, &state.config.session_secret).is_some()
}

// --- Public Handlers ---

/// index
///
/// [Public Route] The front page: every post, ordered by date_posted descending.
pub async fn index(State(state): State<AppState>, jar: CookieJar) -> Result<Markup, AppError> {
    let posts = state.repo.list_posts().await?;
    Ok(views::index(&posts, nav_logged_in(&jar, &state)))
}

/// about
///
/// [Public Route] Static info page.
pub async fn about(State(state): State<AppState>, jar: CookieJar) -> Markup {
    views::about(nav_logged_in(&jar, &state))
}

/// contact
///
/// [Public Route] Static info page.
pub async fn contact(State(state): State<AppState>, jar: CookieJar) -> Markup {
    views::contact(nav_logged_in(&jar, &state))
}

/// show_post
///
/// [Public Route] Single-post detail page. An absent id propagates as NotFound —
/// there is no graceful missing-post page.
pub async fn show_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> Result<Markup, AppError> {
    let post = state.repo.get_post(id).await?;
    Ok(views::post_detail(&post, nav_logged_in(&jar, &state)))
}

/// register_page
///
/// [Public Route] Presents the empty admin-registration form.
pub async fn register_page() -> Markup {
    views::register(&RegisterForm::default(), None, None)
}

/// register_submit
///
/// [Public Route] Validates the registration form, hashes the password and creates
/// the admin row. Failure paths re-present the form in place:
/// field-level bounds and the password/confirm mismatch come from the validator;
/// a taken username comes back from the store's UNIQUE constraint.
/// Success redirects to the login page.
pub async fn register_submit(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    if let Err(errors) = form.validate() {
        return Ok(views::register(&form, Some(&errors), None).into_response());
    }

    // Only the derived digest leaves this scope; the plaintext stays in the form.
    let password_hash = auth::hash_password(&form.password)?;

    match state.repo.create_admin(&form, &password_hash).await {
        Ok(admin) => {
            tracing::info!(username = %admin.username, "admin account registered");
            Ok(Redirect::to("/login").into_response())
        }
        Err(AppError::UsernameTaken) => {
            Ok(views::register(&form, None, Some("Username already registered")).into_response())
        }
        Err(other) => Err(other),
    }
}

/// login_page
///
/// [Public Route] Presents the login form. If the auth gate bounced the visitor
/// here, its one-shot flash cookie is displayed and cleared.
pub async fn login_page(jar: CookieJar) -> impl IntoResponse {
    let flash = jar.get(FLASH_COOKIE).map(|c| c.value().to_string());
    let jar = jar.remove(Cookie::build((FLASH_COOKIE, "")).path("/"));
    (jar, views::login(None, flash.as_deref()))
}

/// login_submit
///
/// [Public Route] The anonymous → authenticated transition. Looks up exactly one
/// admin by username (zero rows propagates as NotFound), verifies the candidate
/// against the stored hash one-way, and on success signs the session cookie and
/// redirects to the dashboard. A failed verification re-renders the login form
/// with the generic "Invalid Login" — it does not reveal which part was wrong.
pub async fn login_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let admin = state.repo.find_admin_by_username(&form.username).await?;

    if !auth::verify_password(&form.password, &admin.password) {
        tracing::warn!(username = %form.username, "failed login attempt");
        return Ok(views::login(Some("Invalid Login"), None).into_response());
    }

    let token = auth::issue_session(&admin.username, &state.config.session_secret)?;
    let session = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .build();

    tracing::info!(username = %admin.username, "session started");
    Ok((jar.add(session), Redirect::to("/dashboard")).into_response())
}

// --- Protected Handlers ---

/// dashboard
///
/// [Protected Route] The admin listing with edit and delete controls.
pub async fn dashboard(
    session: AuthSession,
    State(state): State<AppState>,
) -> Result<Markup, AppError> {
    let posts = state.repo.list_posts().await?;
    Ok(views::dashboard(&posts, &session.username))
}

/// add_page
///
/// [Protected Route] Presents the empty post-authoring form.
pub async fn add_page(_session: AuthSession) -> Markup {
    views::post_form("New Post", "/add", &PostForm::default(), None)
}

/// add_submit
///
/// [Protected Route] Validates and persists a new post, then redirects to the
/// listing. A rejected form is re-rendered with the entered text intact and
/// nothing persisted.
pub async fn add_submit(
    _session: AuthSession,
    State(state): State<AppState>,
    Form(form): Form<PostForm>,
) -> Result<Response, AppError> {
    if let Err(errors) = form.validate() {
        return Ok(views::post_form("New Post", "/add", &form, Some(&errors)).into_response());
    }

    let post = state.repo.create_post(&form).await?;
    tracing::info!(post_id = post.id, "post created");
    Ok(Redirect::to("/").into_response())
}

/// edit_page
///
/// [Protected Route] Presents the authoring form pre-populated from the existing
/// post. NotFound propagates if the id is absent.
pub async fn edit_page(
    _session: AuthSession,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Markup, AppError> {
    let post = state.repo.get_post(id).await?;
    let form = PostForm {
        title: post.title,
        subtitle: post.subtitle,
        author: post.author,
        content: post.content,
    };
    let action = format!("/edit/{id}");
    Ok(views::post_form("Edit Post", &action, &form, None))
}

/// edit_submit
///
/// [Protected Route] Overwrites the four mutable fields of an existing post in
/// place and redirects to the listing. date_posted is never touched.
pub async fn edit_submit(
    _session: AuthSession,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<PostForm>,
) -> Result<Response, AppError> {
    let action = format!("/edit/{id}");
    if let Err(errors) = form.validate() {
        return Ok(views::post_form("Edit Post", &action, &form, Some(&errors)).into_response());
    }

    let post = state.repo.update_post(id, &form).await?;
    tracing::info!(post_id = post.id, "post updated");
    Ok(Redirect::to("/").into_response())
}

/// delete_post
///
/// [Protected Route] Removes a post unconditionally — no confirmation step, no
/// soft-delete — and redirects to the listing. Registered for both GET and POST,
/// preserved as an explicit choice: a bare link visit deletes data.
pub async fn delete_post(
    _session: AuthSession,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Redirect, AppError> {
    state.repo.delete_post(id).await?;
    tracing::info!(post_id = id, "post deleted");
    Ok(Redirect::to("/"))
}

/// logout
///
/// [Protected Route] The authenticated → anonymous transition: clears the session
/// cookie unconditionally and redirects to the login page.
pub async fn logout(_session: AuthSession, jar: CookieJar) -> impl IntoResponse {
    let jar = jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/"));
    (jar, Redirect::to("/login"))
}
