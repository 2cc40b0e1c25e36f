//! Entrance transition reports from the browser.

use axum::{Form, http::StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::middleware::CurrentVisitor;

/// A transition the browser just played.
#[derive(Debug, Deserialize)]
pub struct PlayedForm {
    pub section: String,
    pub key: String,
}

/// Record a played transition.
///
/// POST /animations/played
///
/// `204` when the transition was pending, `404` when it is unknown or had
/// already played.
///
/// # Errors
///
/// Returns `AppError::NotFound` for a transition with nothing pending.
pub async fn played(
    CurrentVisitor(visitor): CurrentVisitor,
    Form(form): Form<PlayedForm>,
) -> Result<StatusCode> {
    if visitor.transition_played(&form.section, &form.key) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        debug!(section = %form.section, key = %form.key, "Ignoring transition report");
        Err(AppError::NotFound(format!(
            "transition {}/{}",
            form.section, form.key
        )))
    }
}
