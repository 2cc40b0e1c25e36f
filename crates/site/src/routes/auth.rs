//! Admin session route handlers.
//!
//! Login and logout are delegated to the backend; the site only mirrors the
//! outcome in the visitor's session.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    http::{HeaderMap, StatusCode},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use portfolio_core::AdminId;
use secrecy::SecretString;
use serde::Deserialize;
use tracing::instrument;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::CurrentVisitor;
use crate::nav::Nav;
use crate::session::LoginOutcome;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

// =============================================================================
// Templates
// =============================================================================

/// The login form with its alert.
///
/// `busy` renders the submitting state: button disabled, busy label shown.
/// HTMX applies the same state in the browser while a request is in flight.
#[derive(Debug, Clone, Default)]
pub struct LoginCard {
    pub email: String,
    pub error: Option<String>,
    pub busy: bool,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub nav: Nav,
    pub login_card: LoginCard,
}

/// The login form alone, swapped in place after an HTMX submission.
#[derive(Template, WebTemplate)]
#[template(path = "fragments/login_card.html")]
pub struct LoginCardTemplate {
    pub login_card: LoginCard,
}

fn is_htmx(headers: &HeaderMap) -> bool {
    headers.get("HX-Request").is_some_and(|v| v == "true")
}

// =============================================================================
// Routes
// =============================================================================

/// Display the login page.
///
/// Loading the page is an app load, so the session is verified first and
/// the nav reflects the result.
#[instrument(skip_all)]
pub async fn login_page(CurrentVisitor(visitor): CurrentVisitor) -> impl IntoResponse {
    visitor.verify().await;
    LoginTemplate {
        nav: visitor.nav(),
        login_card: LoginCard {
            busy: visitor.login_form().is_busy(),
            ..LoginCard::default()
        },
    }
}

/// Handle login form submission.
///
/// An admin lands on the home page; anything else re-renders the form with
/// the email kept and the reason shown. HTMX submissions get the form
/// fragment back (or an `HX-Redirect`), plain posts get the full page.
#[instrument(skip_all)]
pub async fn login(
    CurrentVisitor(visitor): CurrentVisitor,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Response {
    let htmx = is_htmx(&headers);
    match visitor
        .submit_login(&form.email, SecretString::from(form.password))
        .await
    {
        LoginOutcome::Authenticated => {
            if let Some(admin) = visitor.session().current().admin() {
                set_sentry_user(admin.id.as_ref().map(AdminId::as_str), admin.email.as_deref());
            }
            if htmx {
                (AppendHeaders([("HX-Redirect", "/")]), StatusCode::OK).into_response()
            } else {
                Redirect::to("/").into_response()
            }
        }
        LoginOutcome::Rejected(message) => {
            let login_card = LoginCard {
                email: form.email,
                error: Some(message),
                busy: false,
            };
            if htmx {
                LoginCardTemplate { login_card }.into_response()
            } else {
                (
                    StatusCode::UNAUTHORIZED,
                    LoginTemplate {
                        nav: visitor.nav(),
                        login_card,
                    },
                )
                    .into_response()
            }
        }
    }
}

/// Handle logout.
///
/// The local session is cleared even if the backend call fails.
#[instrument(skip_all)]
pub async fn logout(CurrentVisitor(visitor): CurrentVisitor) -> Redirect {
    visitor.logout().await;
    clear_sentry_user();
    Redirect::to("/")
}
