//! Security headers middleware for XSS, clickjacking, and isolation protection.
//!
//! Start locked down and loosen only where the page needs it: htmx comes
//! from unpkg, certification badges and PDFs are served by the backend (or
//! its CDN) and the PDF viewer is an iframe.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{
        HeaderName, HeaderValue,
        header::{
            CONTENT_SECURITY_POLICY, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS,
        },
    },
    middleware::Next,
    response::Response,
};
use url::Url;

use crate::config::ApiConfig;

/// Script CDN serving htmx.
pub const HTMX_ORIGIN: &str = "https://unpkg.com";

/// Precomputed header values.
#[derive(Debug, Clone)]
pub struct SecurityHeaders {
    csp: HeaderValue,
}

impl SecurityHeaders {
    /// Build the policy for a site talking to `api`.
    ///
    /// Media may come from any `https:` origin (uploads are stored on a
    /// CDN) plus the backend's own origin, which matters when the backend
    /// is plain `http` in development.
    #[must_use]
    pub fn new(api: &ApiConfig) -> Arc<Self> {
        let policy = content_security_policy(api);
        let csp = HeaderValue::from_str(&policy)
            .unwrap_or_else(|_| HeaderValue::from_static("default-src 'self'"));
        Arc::new(Self { csp })
    }
}

/// The `Content-Security-Policy` value for a backend at `api`.
#[must_use]
pub fn content_security_policy(api: &ApiConfig) -> String {
    let backend = Url::parse(&api.base_url)
        .ok()
        .map(|url| url.origin().ascii_serialization())
        .filter(|origin| origin != "null")
        .map(|origin| format!(" {origin}"))
        .unwrap_or_default();

    format!(
        "default-src 'none'; \
         script-src 'self' {HTMX_ORIGIN}; \
         style-src 'self'; \
         font-src 'self'; \
         img-src 'self' https:{backend}; \
         media-src 'self' https:{backend}; \
         frame-src https:{backend}; \
         connect-src 'self'; \
         object-src 'none'; \
         base-uri 'self'; \
         form-action 'self'; \
         frame-ancestors 'none'"
    )
}

/// Add security headers to all responses.
///
/// Headers applied:
/// - `X-Frame-Options: DENY` - Prevent clickjacking
/// - `X-Content-Type-Options: nosniff` - Prevent MIME sniffing
/// - `Referrer-Policy: no-referrer` - Zero referrer leakage
/// - `Content-Security-Policy` - See [`content_security_policy`]
/// - `Permissions-Policy` - Deny sensitive features
/// - `Cross-Origin-Opener-Policy: same-origin` - Process isolation
/// - `Cross-Origin-Embedder-Policy: credentialless` - Cross-origin media still loads
pub async fn security_headers_middleware(
    State(security): State<Arc<SecurityHeaders>>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(REFERRER_POLICY, HeaderValue::from_static("no-referrer"));
    headers.insert(CONTENT_SECURITY_POLICY, security.csp.clone());

    headers.insert(
        HeaderName::from_static("permissions-policy"),
        HeaderValue::from_static(
            "accelerometer=(), \
             camera=(), \
             display-capture=(), \
             geolocation=(), \
             gyroscope=(), \
             magnetometer=(), \
             microphone=(), \
             payment=(), \
             usb=(), \
             fullscreen=(self)",
        ),
    );

    headers.insert(
        HeaderName::from_static("cross-origin-opener-policy"),
        HeaderValue::from_static("same-origin"),
    );

    // require-corp would block CDN-hosted badges that send no CORP header
    headers.insert(
        HeaderName::from_static("cross-origin-embedder-policy"),
        HeaderValue::from_static("credentialless"),
    );

    headers.insert(
        HeaderName::from_static("x-dns-prefetch-control"),
        HeaderValue::from_static("off"),
    );

    response
}
