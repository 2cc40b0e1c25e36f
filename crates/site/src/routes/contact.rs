//! Contact form route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, response::IntoResponse};
use tracing::instrument;

use crate::contact::{ContactDraft, ContactOutcome};
use crate::middleware::CurrentVisitor;

/// The contact form and the result of its last submit.
#[derive(Debug, Clone, Default)]
pub struct ContactForm {
    pub draft: ContactDraft,
    pub result: Option<ContactOutcome>,
}

impl ContactForm {
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.result.as_ref().map(ContactOutcome::message)
    }

    #[must_use]
    pub fn sent(&self) -> bool {
        self.result.as_ref().is_some_and(ContactOutcome::is_sent)
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "fragments/contact_form.html")]
pub struct ContactFormTemplate {
    pub contact_form: ContactForm,
}

/// Send a contact message.
///
/// POST /contact
///
/// Returns the form again: cleared with the confirmation on success, with
/// the draft and the error otherwise.
#[instrument(skip_all)]
pub async fn submit(
    CurrentVisitor(visitor): CurrentVisitor,
    Form(draft): Form<ContactDraft>,
) -> impl IntoResponse {
    let outcome = visitor.send_contact(&draft).await;
    let draft = if outcome.is_sent() {
        ContactDraft::default()
    } else {
        draft
    };

    ContactFormTemplate {
        contact_form: ContactForm {
            draft,
            result: Some(outcome),
        },
    }
}
