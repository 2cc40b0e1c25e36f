//! HTTP middleware stack for the site.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with `request_id` and `visitor_id` fields)
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers (CSP, frame and referrer policy)
//! 5. Session layer (tower-sessions with in-memory store)
//!
//! The [`CurrentVisitor`] extractor then resolves the session to its visitor.

pub mod request_id;
pub mod security_headers;
pub mod session;
pub mod visitor;

pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
pub use visitor::CurrentVisitor;
