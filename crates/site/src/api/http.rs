//! `reqwest` implementation of the backend API.

use std::sync::Arc;

use portfolio_core::{Certification, Project};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use super::types::ErrorBody;
use super::{
    ApiError, Attachment, ContactMessage, ContactReceipt, Credentials, LoginResponse,
    NewCertification, NewProject, PortfolioApi, VerifyResponse,
};
use crate::config::ApiConfig;

/// HTTP client for the portfolio backend.
///
/// Each instance owns a cookie jar, so the backend's session cookie set by
/// `login` is sent on every later call made through the same instance (and
/// only through it). Cheaply cloneable.
#[derive(Clone)]
pub struct HttpApi {
    inner: Arc<HttpApiInner>,
}

impl std::fmt::Debug for HttpApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpApi")
            .field("base_url", &self.inner.config.base_url)
            .finish_non_exhaustive()
    }
}

struct HttpApiInner {
    client: reqwest::Client,
    config: ApiConfig,
}

impl HttpApi {
    /// Create a client with an empty cookie jar.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .user_agent(concat!("portfolio-site/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(HttpApiInner {
                client,
                config: config.clone(),
            }),
        })
    }

    fn url(&self, path: &str) -> String {
        self.inner.config.endpoint(path)
    }

    /// Read a JSON body, turning non-success statuses into [`ApiError::Api`].
    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(error_from_body(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| ApiError::Parse(e.to_string()))
    }
}

/// Build an [`ApiError::Api`] from an error response body.
fn error_from_body(status: u16, body: &str) -> ApiError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(ErrorBody::into_message);
    ApiError::Api { status, message }
}

fn attachment_part(attachment: Attachment) -> Result<Part, ApiError> {
    let part = Part::bytes(attachment.bytes).file_name(attachment.file_name);
    match attachment.content_type {
        Some(content_type) => Ok(part.mime_str(&content_type)?),
        None => Ok(part),
    }
}

impl PortfolioApi for HttpApi {
    #[instrument(skip(self))]
    async fn verify_session(&self) -> Result<VerifyResponse, ApiError> {
        let response = self.inner.client.get(self.url("/auth/verify")).send().await?;
        Self::read_json(response).await
    }

    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let response = self
            .inner
            .client
            .post(self.url("/auth/login"))
            .json(credentials)
            .send()
            .await?;
        Self::read_json(response).await
    }

    #[instrument(skip(self))]
    async fn logout(&self) -> Result<(), ApiError> {
        let response = self
            .inner
            .client
            .post(self.url("/auth/logout"))
            .json(&serde_json::json!({}))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_from_body(status.as_u16(), &body));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        let response = self.inner.client.get(self.url("/projects")).send().await?;
        let projects: Vec<Project> = Self::read_json(response).await?;
        debug!(count = projects.len(), "Fetched projects");
        Ok(projects)
    }

    #[instrument(skip(self, project), fields(title = %project.title))]
    async fn create_project(&self, project: &NewProject) -> Result<Project, ApiError> {
        let response = self
            .inner
            .client
            .post(self.url("/projects"))
            .json(project)
            .send()
            .await?;
        Self::read_json(response).await
    }

    #[instrument(skip(self))]
    async fn list_certifications(&self) -> Result<Vec<Certification>, ApiError> {
        let response = self
            .inner
            .client
            .get(self.url("/certifications"))
            .send()
            .await?;
        let certifications: Vec<Certification> = Self::read_json(response).await?;
        debug!(count = certifications.len(), "Fetched certifications");
        Ok(certifications)
    }

    #[instrument(skip(self, certification), fields(title = %certification.title))]
    async fn create_certification(
        &self,
        certification: NewCertification,
    ) -> Result<Certification, ApiError> {
        let form = Form::new()
            .text("title", certification.title)
            .text("platform", certification.platform)
            .text("year", certification.year)
            .part("image", attachment_part(certification.image)?)
            .part("pdf", attachment_part(certification.pdf)?);

        let response = self
            .inner
            .client
            .post(self.url("/certifications/add"))
            .multipart(form)
            .send()
            .await?;
        Self::read_json(response).await
    }

    #[instrument(skip(self, message), fields(email = %message.email))]
    async fn send_contact(&self, message: &ContactMessage) -> Result<ContactReceipt, ApiError> {
        let response = self
            .inner
            .client
            .post(self.url("/contact/send"))
            .json(message)
            .send()
            .await?;
        Self::read_json(response).await
    }
}
