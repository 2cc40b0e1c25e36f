//! Contact form submission.

use portfolio_core::Email;
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::api::{ApiError, ContactMessage, PortfolioApi};

pub const SENT_MESSAGE: &str = "Message sent successfully!";
pub const FAILED_MESSAGE: &str = "Something went wrong";

/// Contact form input, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ContactDraft {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// What the contact form shows after a submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactOutcome {
    /// Delivered; the form is cleared.
    Sent(String),
    /// Not delivered; the draft stays in the form.
    Failed(String),
}

impl ContactOutcome {
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Sent(m) | Self::Failed(m) => m,
        }
    }

    #[must_use]
    pub const fn is_sent(&self) -> bool {
        matches!(self, Self::Sent(_))
    }
}

impl ContactDraft {
    /// Check the draft and build the request body.
    ///
    /// # Errors
    ///
    /// Returns the message to show when a field is blank or the email is
    /// not an address.
    pub fn validate(&self) -> Result<ContactMessage, String> {
        let name = self.name.trim();
        let message = self.message.trim();
        if name.is_empty() || message.is_empty() || self.email.trim().is_empty() {
            return Err("Name, email and message are required.".to_string());
        }
        let email = Email::parse(&self.email)
            .map_err(|_| "Please enter a valid email address.".to_string())?;

        Ok(ContactMessage {
            name: name.to_string(),
            email,
            message: message.to_string(),
        })
    }
}

fn failure_message(error: &ApiError) -> String {
    match error {
        ApiError::Api { message: Some(m), .. } => m.clone(),
        ApiError::Http(e) => e.to_string(),
        ApiError::Api { message: None, .. } | ApiError::Parse(_) => FAILED_MESSAGE.to_string(),
    }
}

/// Send the contact form. One attempt, no retry.
#[instrument(skip_all)]
pub async fn submit_contact<A: PortfolioApi>(api: &A, draft: &ContactDraft) -> ContactOutcome {
    let message = match draft.validate() {
        Ok(message) => message,
        Err(e) => return ContactOutcome::Failed(e),
    };

    match api.send_contact(&message).await {
        Ok(receipt) => {
            info!(domain = message.email.domain(), "Contact message delivered");
            ContactOutcome::Sent(
                receipt
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| SENT_MESSAGE.to_string()),
            )
        }
        Err(e) => {
            warn!(error = %e, "Contact message failed");
            ContactOutcome::Failed(failure_message(&e))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::api::ContactReceipt;
    use crate::api::fake::{FakeApi, Reply};

    fn draft() -> ContactDraft {
        ContactDraft {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            message: "Hello there".to_string(),
        }
    }

    #[tokio::test]
    async fn test_backend_message_is_shown_on_success() {
        let api = FakeApi::default();

        let outcome = submit_contact(&api, &draft()).await;

        assert_eq!(outcome, ContactOutcome::Sent("Thanks for reaching out!".to_string()));
    }

    #[tokio::test]
    async fn test_default_success_message() {
        let api = FakeApi::default();
        *api.contact.lock().unwrap() = Reply::Ok(ContactReceipt::default());

        let outcome = submit_contact(&api, &draft()).await;

        assert_eq!(outcome, ContactOutcome::Sent(SENT_MESSAGE.to_string()));
    }

    #[tokio::test]
    async fn test_failure_messages() {
        let api = FakeApi::default();
        *api.contact.lock().unwrap() = Reply::Status(500, Some("Mailer down".to_string()));
        assert_eq!(
            submit_contact(&api, &draft()).await,
            ContactOutcome::Failed("Mailer down".to_string())
        );

        *api.contact.lock().unwrap() = Reply::Status(500, None);
        assert_eq!(
            submit_contact(&api, &draft()).await,
            ContactOutcome::Failed(FAILED_MESSAGE.to_string())
        );
    }

    #[tokio::test]
    async fn test_invalid_draft_is_not_sent() {
        let api = FakeApi::default();
        let mut bad = draft();
        bad.email = "not-an-email".to_string();

        let outcome = submit_contact(&api, &bad).await;

        assert!(!outcome.is_sent());
        assert_eq!(outcome.message(), "Please enter a valid email address.");
        assert_eq!(api.contact_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_blank_fields_are_required() {
        let mut bad = draft();
        bad.message = "  ".to_string();
        assert!(bad.validate().is_err());
    }
}
