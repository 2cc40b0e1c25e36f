//! Session middleware configuration.
//!
//! The site's own cookie only identifies the browser; everything else lives
//! in the visitor state it points at. Sessions are held in memory, so a
//! restart starts every visitor over (the backend session is re-verified
//! on the next page load anyway).

use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::SiteConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "portfolio_session";

/// Create the session layer with an in-memory store.
///
/// The cookie expires after the same period of inactivity that evicts the
/// visitor state.
#[must_use]
pub fn create_session_layer(config: &SiteConfig) -> SessionManagerLayer<MemoryStore> {
    let idle_seconds = i64::try_from(config.visitor_idle.as_secs()).unwrap_or(i64::MAX);

    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(idle_seconds),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
