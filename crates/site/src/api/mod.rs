//! Backend REST API.
//!
//! The backend owns authentication, projects, certifications and contact
//! delivery. Everything the site knows comes through [`PortfolioApi`]:
//! [`HttpApi`] talks to the real service, tests substitute a fake.
//!
//! # Endpoints
//!
//! ```text
//! GET  {API}/auth/verify           - Is the session cookie a valid admin session?
//! POST {API}/auth/login            - Email/password login, sets the session cookie
//! POST {API}/auth/logout           - Clears the server-side session
//! GET  {API}/projects              - Project collection
//! POST {API}/projects              - Create project (JSON)
//! GET  {API}/certifications        - Certification collection
//! POST {API}/certifications/add    - Create certification (multipart)
//! POST {API}/contact/send          - Deliver a contact message
//! ```
//!
//! Every call carries the visitor's cookies. Each call is attempted exactly
//! once; there is no retry or client-side timeout beyond the transport default.

mod http;
pub mod types;

#[cfg(test)]
pub mod fake;

use std::future::Future;

use portfolio_core::{Certification, Project};
use thiserror::Error;

pub use http::HttpApi;
pub use types::{
    Attachment, ContactMessage, ContactReceipt, Credentials, LoginResponse, NewCertification,
    NewProject, VerifyResponse,
};

/// Errors that can occur when calling the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure: connection refused, TLS, timeout, body read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("API error: {status} - {}", message.as_deref().unwrap_or("no message"))]
    Api {
        status: u16,
        /// Human-readable message from the backend's error payload, if any.
        message: Option<String>,
    },

    /// The backend answered successfully but the payload was not understood.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl ApiError {
    /// The backend's own explanation, when it sent one.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } => message.as_deref(),
            Self::Http(_) | Self::Parse(_) => None,
        }
    }

    /// Message for display: the backend's explanation or `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }
}

/// Operations the site needs from the backend.
pub trait PortfolioApi: Send + Sync + 'static {
    /// Ask whether the ambient session cookie belongs to a signed-in admin.
    fn verify_session(&self) -> impl Future<Output = Result<VerifyResponse, ApiError>> + Send;

    /// Submit login credentials.
    fn login(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<LoginResponse, ApiError>> + Send;

    /// End the server-side session.
    fn logout(&self) -> impl Future<Output = Result<(), ApiError>> + Send;

    fn list_projects(&self) -> impl Future<Output = Result<Vec<Project>, ApiError>> + Send;

    /// Create a project; the backend echoes the stored record.
    fn create_project(
        &self,
        project: &NewProject,
    ) -> impl Future<Output = Result<Project, ApiError>> + Send;

    fn list_certifications(
        &self,
    ) -> impl Future<Output = Result<Vec<Certification>, ApiError>> + Send;

    /// Upload a certification; the backend echoes the stored record.
    fn create_certification(
        &self,
        certification: NewCertification,
    ) -> impl Future<Output = Result<Certification, ApiError>> + Send;

    fn send_contact(
        &self,
        message: &ContactMessage,
    ) -> impl Future<Output = Result<ContactReceipt, ApiError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_server_text() {
        let err = ApiError::Api {
            status: 401,
            message: Some("Invalid credentials".to_string()),
        };
        assert_eq!(err.user_message("Login failed"), "Invalid credentials");
        assert_eq!(err.to_string(), "API error: 401 - Invalid credentials");
    }

    #[test]
    fn test_user_message_falls_back() {
        let err = ApiError::Api {
            status: 500,
            message: None,
        };
        assert_eq!(err.user_message("Login failed"), "Login failed");

        let err = ApiError::Parse("expected value".to_string());
        assert_eq!(err.user_message("Login failed"), "Login failed");
    }
}
