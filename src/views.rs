//! Server-rendered pages.
//!
//! Presentation only: every function takes already-fetched data and returns
//! [`maud::Markup`]. All dynamic content is HTML-escaped by maud. No view
//! touches the repository or the session — handlers decide what to render.

use maud::{DOCTYPE, Markup, html};
use validator::ValidationErrors;

use crate::models::{Post, PostForm, RegisterForm};

/// Shared page chrome: header, navigation and footer. The nav switches between
/// the anonymous links and the admin links based on the session state the
/// handler resolved.
fn layout(title: &str, logged_in: bool, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { (title) " - Inkpot" }
            }
            body {
                nav {
                    a href="/" { "Home" }
                    " | "
                    a href="/about" { "About" }
                    " | "
                    a href="/contact" { "Contact" }
                    " | "
                    @if logged_in {
                        a href="/dashboard" { "Dashboard" }
                        " | "
                        a href="/add" { "New Post" }
                        " | "
                        a href="/logout" { "Logout" }
                    } @else {
                        a href="/login" { "Login" }
                    }
                }
                hr;
                (body)
            }
        }
    }
}

/// Pulls the display messages for one field out of the collected validation errors.
fn field_messages(errors: Option<&ValidationErrors>, field: &str) -> Vec<String> {
    let Some(errors) = errors else {
        return Vec::new();
    };
    errors
        .field_errors()
        .get(field)
        .map(|field_errors| {
            field_errors
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Renders the per-field error list shown next to a form input.
fn field_error_list(errors: Option<&ValidationErrors>, field: &str) -> Markup {
    let messages = field_messages(errors, field);
    html! {
        @if !messages.is_empty() {
            ul class="errors" {
                @for message in &messages {
                    li { (message) }
                }
            }
        }
    }
}

/// Public listing page: every post, newest first, title linking to the detail page.
pub fn index(posts: &[Post], logged_in: bool) -> Markup {
    layout(
        "Home",
        logged_in,
        html! {
            h1 { "Latest Posts" }
            @if posts.is_empty() {
                p { "Nothing here yet." }
            }
            @for post in posts {
                article {
                    h2 { a href={ "/post/" (post.id) "/" } { (post.title) } }
                    h3 { (post.subtitle) }
                    p {
                        "By " (post.author)
                        " on " (post.date_posted.format("%B %e, %Y"))
                    }
                }
            }
        },
    )
}

/// Static info page.
pub fn about(logged_in: bool) -> Markup {
    layout(
        "About",
        logged_in,
        html! {
            h1 { "About" }
            p { "A minimal personal blog: posts on the front page, one admin behind the curtain." }
        },
    )
}

/// Static info page.
pub fn contact(logged_in: bool) -> Markup {
    layout(
        "Contact",
        logged_in,
        html! {
            h1 { "Contact" }
            p { "Drop the author a line at the address on the about page." }
        },
    )
}

/// Single-post detail page.
pub fn post_detail(post: &Post, logged_in: bool) -> Markup {
    layout(
        &post.title,
        logged_in,
        html! {
            article {
                h1 { (post.title) }
                h2 { (post.subtitle) }
                p {
                    "By " (post.author)
                    " on " (post.date_posted.format("%B %e, %Y"))
                }
                div class="content" { (post.content) }
            }
        },
    )
}

/// Admin view: the same posts as the public listing plus edit/delete controls.
pub fn dashboard(posts: &[Post], username: &str) -> Markup {
    layout(
        "Dashboard",
        true,
        html! {
            h1 { "Dashboard" }
            p { "Logged in as " (username) }
            table {
                tr { th { "Title" } th { "Author" } th { "Posted" } th {} th {} }
                @for post in posts {
                    tr {
                        td { a href={ "/post/" (post.id) "/" } { (post.title) } }
                        td { (post.author) }
                        td { (post.date_posted.format("%Y-%m-%d")) }
                        td { a href={ "/edit/" (post.id) } { "Edit" } }
                        td { a href={ "/delete/" (post.id) "/" } { "Delete" } }
                    }
                }
            }
        },
    )
}

/// The post-authoring form, shared by add and edit. Re-rendered in place with the
/// entered text and field messages when validation rejects a submission.
pub fn post_form(
    heading: &str,
    action: &str,
    form: &PostForm,
    errors: Option<&ValidationErrors>,
) -> Markup {
    layout(
        heading,
        true,
        html! {
            h1 { (heading) }
            form method="post" action=(action) {
                p {
                    label for="title" { "Title" }
                    input type="text" name="title" id="title" value=(form.title);
                    (field_error_list(errors, "title"))
                }
                p {
                    label for="subtitle" { "Subtitle" }
                    input type="text" name="subtitle" id="subtitle" value=(form.subtitle);
                    (field_error_list(errors, "subtitle"))
                }
                p {
                    label for="author" { "Author" }
                    input type="text" name="author" id="author" value=(form.author);
                    (field_error_list(errors, "author"))
                }
                p {
                    label for="content" { "Content" }
                    textarea name="content" id="content" rows="20" { (form.content) }
                    (field_error_list(errors, "content"))
                }
                button type="submit" { "Save" }
            }
        },
    )
}

/// The admin self-registration form. `store_error` carries a rejection that came
/// from the store rather than the validator (a taken username).
pub fn register(
    form: &RegisterForm,
    errors: Option<&ValidationErrors>,
    store_error: Option<&str>,
) -> Markup {
    layout(
        "Register",
        false,
        html! {
            h1 { "Register" }
            @if let Some(message) = store_error {
                p class="error" { (message) }
            }
            form method="post" action="/register" {
                p {
                    label for="name" { "Name" }
                    input type="text" name="name" id="name" value=(form.name);
                    (field_error_list(errors, "name"))
                }
                p {
                    label for="username" { "Username" }
                    input type="text" name="username" id="username" value=(form.username);
                    (field_error_list(errors, "username"))
                }
                p {
                    label for="email" { "Email" }
                    input type="text" name="email" id="email" value=(form.email);
                    (field_error_list(errors, "email"))
                }
                p {
                    label for="password" { "Password" }
                    input type="password" name="password" id="password";
                    (field_error_list(errors, "password"))
                }
                p {
                    label for="confirm" { "Confirm Password" }
                    input type="password" name="confirm" id="confirm";
                }
                button type="submit" { "Register" }
            }
        },
    )
}

/// The login form. `error` is the generic credential-mismatch message; `flash` is
/// the one-shot warning set by the auth gate's redirect.
pub fn login(error: Option<&str>, flash: Option<&str>) -> Markup {
    layout(
        "Login",
        false,
        html! {
            h1 { "Login" }
            @if let Some(message) = flash {
                p class="warning" { (message) }
            }
            @if let Some(message) = error {
                p class="error" { (message) }
            }
            form method="post" action="/login" {
                p {
                    label for="username" { "Username" }
                    input type="text" name="username" id="username";
                }
                p {
                    label for="password" { "Password" }
                    input type="password" name="password" id="password";
                }
                button type="submit" { "Login" }
            }
        },
    )
}
