//! Visitor extractor.
//!
//! Binds each browser session to its [`Visitor`](crate::visitor::Visitor),
//! creating both on first contact.

use std::sync::Arc;

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;
use tracing::Span;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::{AppState, SiteVisitor};

/// Session key holding the visitor id.
pub const VISITOR_ID_KEY: &str = "visitor_id";

/// Extractor yielding the current browser's visitor state.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(CurrentVisitor(visitor): CurrentVisitor) -> impl IntoResponse {
///     visitor.nav().is_admin().to_string()
/// }
/// ```
pub struct CurrentVisitor(pub Arc<SiteVisitor>);

impl FromRequestParts<AppState> for CurrentVisitor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer not installed".to_string()))?;

        let id = if let Some(id) = session.get::<Uuid>(VISITOR_ID_KEY).await? {
            id
        } else {
            let id = Uuid::new_v4();
            session.insert(VISITOR_ID_KEY, id).await?;
            id
        };

        Span::current().record("visitor_id", tracing::field::display(id));

        Ok(Self(state.visitor(id).await?))
    }
}
