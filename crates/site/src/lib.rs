//! Rupak Das portfolio site library.
//!
//! The single-page portfolio is rendered server-side; HTMX handles the
//! in-page interactions (admin modals, contact form). The backend REST API
//! owns all data and authentication; this crate keeps a per-visitor mirror
//! of the admin session and the two content sections.
//!
//! The crate is a library so the router can be driven by tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod animation;
pub mod api;
pub mod config;
pub mod contact;
pub mod error;
mod filters;
pub mod middleware;
pub mod nav;
pub mod resources;
pub mod routes;
pub mod session;
pub mod state;
pub mod visitor;

use axum::{Router, extract::Request, routing::get};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use middleware::security_headers::SecurityHeaders;
use state::AppState;

/// Directory served under `/static`.
pub const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Build the complete application router.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());
    let security = SecurityHeaders::new(&state.config().api);

    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(session_layer)
        .layer(axum::middleware::from_fn_with_state(
            security,
            middleware::security_headers_middleware,
        ))
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
                visitor_id = tracing::field::Empty,
            )
        }))
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the backend.
async fn health() -> &'static str {
    "ok"
}
