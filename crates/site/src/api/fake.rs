//! In-memory backend for unit tests.

#![allow(clippy::unwrap_used)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use portfolio_core::{AdminIdentity, Certification, CertificationId, Project, ProjectId};

use super::{
    ApiError, ContactMessage, ContactReceipt, Credentials, LoginResponse, NewCertification,
    NewProject, PortfolioApi, VerifyResponse,
};

/// Canned behaviour for one endpoint.
#[derive(Debug, Clone)]
pub enum Reply<T> {
    Ok(T),
    Status(u16, Option<String>),
    Malformed,
}

impl<T: Clone> Reply<T> {
    fn produce(&self) -> Result<T, ApiError> {
        match self {
            Self::Ok(value) => Ok(value.clone()),
            Self::Status(status, message) => Err(ApiError::Api {
                status: *status,
                message: message.clone(),
            }),
            Self::Malformed => Err(ApiError::Parse("unexpected payload".to_string())),
        }
    }
}

pub fn admin(email: &str) -> AdminIdentity {
    serde_json::from_value(serde_json::json!({ "_id": "admin-1", "email": email })).unwrap()
}

pub fn project(id: &str, title: &str) -> Project {
    Project {
        id: ProjectId::new(id),
        title: title.to_string(),
        description: format!("{title} description"),
        tech: vec!["Rust".to_string()],
        github: format!("https://github.com/example/{id}"),
        demo: "#".to_string(),
        sample_video: String::new(),
    }
}

pub fn certification(id: &str, title: &str) -> Certification {
    Certification {
        id: CertificationId::new(id),
        title: title.to_string(),
        platform: "Coursera".to_string(),
        year: "2024".to_string(),
        image: format!("https://cdn.example.com/{id}.png"),
        pdf: format!("https://cdn.example.com/{id}.pdf"),
    }
}

/// Backend double with per-endpoint replies and call counters.
#[derive(Debug)]
pub struct FakeApi {
    pub verify: Mutex<Reply<VerifyResponse>>,
    pub login: Mutex<Reply<LoginResponse>>,
    pub logout: Mutex<Reply<()>>,
    pub projects: Mutex<Reply<Vec<Project>>>,
    pub certifications: Mutex<Reply<Vec<Certification>>>,
    pub contact: Mutex<Reply<ContactReceipt>>,
    /// When set, create calls fail with this reply instead of echoing.
    pub create_failure: Mutex<Option<(u16, Option<String>)>>,
    pub created_projects: Mutex<Vec<NewProject>>,
    pub created_certifications: Mutex<Vec<NewCertification>>,
    /// When set, login and create calls never answer.
    pub hang: AtomicBool,
    pub login_calls: AtomicUsize,
    pub logout_calls: AtomicUsize,
    pub project_fetches: AtomicUsize,
    pub contact_calls: AtomicUsize,
    next_id: AtomicUsize,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self {
            verify: Mutex::new(Reply::Ok(VerifyResponse {
                success: false,
                admin: None,
                token: None,
            })),
            login: Mutex::new(Reply::Status(401, Some("Invalid credentials".to_string()))),
            logout: Mutex::new(Reply::Ok(())),
            projects: Mutex::new(Reply::Ok(Vec::new())),
            certifications: Mutex::new(Reply::Ok(Vec::new())),
            contact: Mutex::new(Reply::Ok(ContactReceipt {
                message: Some("Thanks for reaching out!".to_string()),
            })),
            create_failure: Mutex::new(None),
            created_projects: Mutex::new(Vec::new()),
            created_certifications: Mutex::new(Vec::new()),
            hang: AtomicBool::new(false),
            login_calls: AtomicUsize::new(0),
            logout_calls: AtomicUsize::new(0),
            project_fetches: AtomicUsize::new(0),
            contact_calls: AtomicUsize::new(0),
            next_id: AtomicUsize::new(100),
        }
    }
}

impl FakeApi {
    /// A backend that reports a valid admin session.
    pub fn signed_in(email: &str) -> Self {
        let api = Self::default();
        *api.verify.lock().unwrap() = Reply::Ok(VerifyResponse {
            success: true,
            admin: Some(admin(email)),
            token: Some("verify-token".to_string()),
        });
        api
    }

    pub fn accept_login(&self, is_admin: bool) {
        *self.login.lock().unwrap() = Reply::Ok(LoginResponse {
            is_admin,
            admin: Some(admin("owner@example.com")),
            token: Some("login-token".to_string()),
        });
    }

    pub fn fail_creates(&self, status: u16, message: Option<&str>) {
        *self.create_failure.lock().unwrap() = Some((status, message.map(str::to_string)));
    }

    fn next_id(&self, prefix: &str) -> String {
        format!("{prefix}-{}", self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    /// Stall forever while `hang` is set.
    async fn maybe_hang(&self) {
        if self.hang.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
    }

    fn create_error(&self) -> Option<ApiError> {
        self.create_failure
            .lock()
            .unwrap()
            .clone()
            .map(|(status, message)| ApiError::Api { status, message })
    }
}

impl PortfolioApi for FakeApi {
    async fn verify_session(&self) -> Result<VerifyResponse, ApiError> {
        let reply = self.verify.lock().unwrap().clone();
        reply.produce()
    }

    async fn login(&self, _credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        self.maybe_hang().await;
        let reply = self.login.lock().unwrap().clone();
        reply.produce()
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.logout.lock().unwrap().clone();
        reply.produce()
    }

    async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        self.project_fetches.fetch_add(1, Ordering::SeqCst);
        let reply = self.projects.lock().unwrap().clone();
        reply.produce()
    }

    async fn create_project(&self, project: &NewProject) -> Result<Project, ApiError> {
        self.maybe_hang().await;
        if let Some(err) = self.create_error() {
            return Err(err);
        }
        self.created_projects.lock().unwrap().push(project.clone());
        Ok(Project {
            id: ProjectId::new(self.next_id("p")),
            title: project.title.clone(),
            description: project.description.clone(),
            tech: project.tech.clone(),
            github: project.github.clone(),
            demo: project.demo.clone(),
            sample_video: project.sample_video.clone(),
        })
    }

    async fn list_certifications(&self) -> Result<Vec<Certification>, ApiError> {
        let reply = self.certifications.lock().unwrap().clone();
        reply.produce()
    }

    async fn create_certification(
        &self,
        certification: NewCertification,
    ) -> Result<Certification, ApiError> {
        self.maybe_hang().await;
        if let Some(err) = self.create_error() {
            return Err(err);
        }
        let id = self.next_id("c");
        let created = Certification {
            id: CertificationId::new(id.clone()),
            title: certification.title.clone(),
            platform: certification.platform.clone(),
            year: certification.year.clone(),
            image: format!("https://cdn.example.com/{id}/{}", certification.image.file_name),
            pdf: format!("https://cdn.example.com/{id}/{}", certification.pdf.file_name),
        };
        self.created_certifications.lock().unwrap().push(certification);
        Ok(created)
    }

    async fn send_contact(&self, _message: &ContactMessage) -> Result<ContactReceipt, ApiError> {
        self.contact_calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.contact.lock().unwrap().clone();
        reply.produce()
    }
}
