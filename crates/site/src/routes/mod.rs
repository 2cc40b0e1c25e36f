//! HTTP route handlers for the site.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (mounts both sections)
//! GET  /health                 - Health check
//!
//! # Admin session
//! GET  /admin-login            - Login page
//! POST /admin-login            - Login action
//! POST /logout                 - Logout action
//!
//! # Sections (HTMX fragments, admin only)
//! POST /projects               - Create project (returns appended card)
//! POST /certifications         - Create certification, multipart (returns appended card)
//!
//! # Misc (HTMX)
//! POST /contact                - Contact form (returns the form with its result)
//! POST /animations/played      - A card's entrance transition played
//! ```

pub mod animations;
pub mod auth;
pub mod certifications;
pub mod contact;
pub mod home;
pub mod projects;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    response::{AppendHeaders, IntoResponse, Response},
    routing::{get, post},
};

use crate::error::{AppError, Result};
use crate::state::{AppState, SiteVisitor};

/// Largest accepted certification upload (badge plus PDF).
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Create the admin session routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/admin-login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the section routes router.
pub fn section_routes() -> Router<AppState> {
    Router::new()
        .route("/projects", post(projects::create))
        .route(
            "/certifications",
            post(certifications::create).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
}

/// Create all routes for the site.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .merge(auth_routes())
        .merge(section_routes())
        .route("/contact", post(contact::submit))
        .route("/animations/played", post(animations::played))
}

/// Refuse admin-only actions for a visitor without an admin session.
///
/// This only gates the UI; the backend enforces real authorization.
pub(crate) fn require_admin(visitor: &SiteVisitor) -> Result<()> {
    if visitor.session().is_authenticated() {
        Ok(())
    } else {
        Err(AppError::Forbidden("admin session required".to_string()))
    }
}

/// Swap `body` over `target` instead of the element the request came from.
pub(crate) fn retarget(target: &'static str, body: impl IntoResponse) -> Response {
    (
        AppendHeaders([("HX-Retarget", target), ("HX-Reswap", "outerHTML")]),
        body,
    )
        .into_response()
}
