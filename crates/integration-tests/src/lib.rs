//! End-to-end harness for the portfolio site.
//!
//! [`FakeBackend`] is an in-process stand-in for the portfolio REST API:
//! cookie-based admin sessions, project and certification collections and
//! contact delivery. [`spawn_site`] runs the real site router against it, so
//! tests drive the site the way a browser does.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p portfolio-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::{
    Json, Router,
    extract::{Multipart, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use portfolio_site::config::{ApiConfig, SiteConfig};
use portfolio_site::state::AppState;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Name of the backend's session cookie.
pub const BACKEND_COOKIE: &str = "token";

/// An account the fake backend accepts.
#[derive(Debug, Clone)]
pub struct Account {
    pub email: String,
    pub password: String,
    pub is_admin: bool,
}

impl Account {
    #[must_use]
    pub fn admin(email: &str, password: &str) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
            is_admin: true,
        }
    }

    #[must_use]
    pub fn member(email: &str, password: &str) -> Self {
        Self {
            is_admin: false,
            ..Self::admin(email, password)
        }
    }
}

#[derive(Default)]
struct Store {
    accounts: Vec<Account>,
    /// token -> account email
    sessions: HashMap<String, String>,
    projects: Vec<Value>,
    certifications: Vec<Value>,
    contact_messages: Vec<Value>,
    logged_out: HashSet<String>,
    /// When set, creations are refused with this message.
    create_rejection: Option<String>,
}

#[derive(Default)]
struct Inner {
    store: Mutex<Store>,
    project_fetches: AtomicUsize,
    certification_fetches: AtomicUsize,
}

/// Handle to a running fake backend.
#[derive(Clone)]
pub struct FakeBackend {
    inner: Arc<Inner>,
    addr: SocketAddr,
}

impl FakeBackend {
    /// Start a backend on an ephemeral port with the given accounts.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start(accounts: Vec<Account>) -> Self {
        let inner = Arc::new(Inner::default());
        inner.store.lock().await.accounts = accounts;

        let router = Router::new()
            .route("/api/auth/verify", get(verify))
            .route("/api/auth/login", post(login))
            .route("/api/auth/logout", post(logout))
            .route("/api/projects", get(list_projects).post(create_project))
            .route("/api/certifications", get(list_certifications))
            .route("/api/certifications/add", post(create_certification))
            .route("/api/contact/send", post(send_contact))
            .with_state(Arc::clone(&inner));

        let addr = serve(router).await;
        Self { inner, addr }
    }

    /// Base URL the site should be configured with.
    #[must_use]
    pub fn api_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// Seed a stored project.
    pub async fn seed_project(&self, title: &str) -> String {
        let id = Uuid::new_v4().simple().to_string();
        self.inner.store.lock().await.projects.push(json!({
            "_id": id,
            "title": title,
            "description": "",
            "tech": ["Rust"],
            "github": "https://github.com/example/seeded",
            "demo": "#",
            "sampleVideo": "",
        }));
        id
    }

    /// Refuse every later project or certification creation with `message`.
    pub async fn reject_creates(&self, message: &str) {
        self.inner.store.lock().await.create_rejection = Some(message.to_string());
    }

    /// How many times the project collection has been read.
    #[must_use]
    pub fn project_fetches(&self) -> usize {
        self.inner.project_fetches.load(Ordering::SeqCst)
    }

    /// How many times the certification collection has been read.
    #[must_use]
    pub fn certification_fetches(&self) -> usize {
        self.inner.certification_fetches.load(Ordering::SeqCst)
    }

    /// Number of live backend sessions.
    pub async fn session_count(&self) -> usize {
        self.inner.store.lock().await.sessions.len()
    }

    /// Emails whose sessions were ended through `/auth/logout`.
    pub async fn logged_out(&self) -> HashSet<String> {
        self.inner.store.lock().await.logged_out.clone()
    }

    pub async fn projects(&self) -> Vec<Value> {
        self.inner.store.lock().await.projects.clone()
    }

    pub async fn certifications(&self) -> Vec<Value> {
        self.inner.store.lock().await.certifications.clone()
    }

    pub async fn contact_messages(&self) -> Vec<Value> {
        self.inner.store.lock().await.contact_messages.clone()
    }
}

/// Run the site router against `backend`; returns the site's base URL.
///
/// # Panics
///
/// Panics if the backend URL is rejected or the listener cannot be bound.
pub async fn spawn_site(backend: &FakeBackend) -> String {
    #[allow(clippy::unwrap_used)]
    let api = ApiConfig::new(&backend.api_url()).unwrap();
    let app = portfolio_site::app(AppState::new(SiteConfig::local(api)));
    let addr = serve(app).await;
    format!("http://{addr}")
}

/// A browser-like client: keeps cookies, does not follow redirects.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn browser() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

async fn serve(router: Router) -> SocketAddr {
    #[allow(clippy::unwrap_used)]
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    #[allow(clippy::unwrap_used)]
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

// =============================================================================
// Backend Handlers
// =============================================================================

type Shared = State<Arc<Inner>>;

fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == BACKEND_COOKIE)
        .map(|(_, value)| value.to_string())
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

async fn verify(State(inner): Shared, headers: HeaderMap) -> Response {
    let store = inner.store.lock().await;
    let email = session_token(&headers).and_then(|token| store.sessions.get(&token).cloned());

    match email {
        Some(email) => Json(json!({
            "success": true,
            "admin": { "_id": "admin-1", "email": email },
        }))
        .into_response(),
        None => error(StatusCode::UNAUTHORIZED, "Not authenticated"),
    }
}

#[derive(Deserialize)]
struct LoginBody {
    email: String,
    password: String,
}

async fn login(State(inner): Shared, Json(body): Json<LoginBody>) -> Response {
    let mut store = inner.store.lock().await;
    let Some(account) = store
        .accounts
        .iter()
        .find(|a| a.email == body.email && a.password == body.password)
        .cloned()
    else {
        return error(StatusCode::UNAUTHORIZED, "Invalid credentials");
    };

    let token = Uuid::new_v4().simple().to_string();
    store.sessions.insert(token.clone(), account.email.clone());

    (
        [(
            header::SET_COOKIE,
            format!("{BACKEND_COOKIE}={token}; Path=/; HttpOnly"),
        )],
        Json(json!({
            "isAdmin": account.is_admin,
            "admin": { "_id": "admin-1", "email": account.email },
        })),
    )
        .into_response()
}

async fn logout(State(inner): Shared, headers: HeaderMap) -> Response {
    let mut store = inner.store.lock().await;
    if let Some(email) = session_token(&headers).and_then(|token| store.sessions.remove(&token)) {
        store.logged_out.insert(email);
    }
    (
        [(header::SET_COOKIE, format!("{BACKEND_COOKIE}=; Path=/; Max-Age=0"))],
        Json(json!({ "message": "Logged out" })),
    )
        .into_response()
}

fn is_signed_in(store: &Store, headers: &HeaderMap) -> bool {
    session_token(headers).is_some_and(|token| store.sessions.contains_key(&token))
}

async fn list_projects(State(inner): Shared) -> Json<Vec<Value>> {
    inner.project_fetches.fetch_add(1, Ordering::SeqCst);
    Json(inner.store.lock().await.projects.clone())
}

async fn create_project(
    State(inner): Shared,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Response {
    let mut store = inner.store.lock().await;
    if !is_signed_in(&store, &headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Unauthorized" })))
            .into_response();
    }
    if let Some(message) = &store.create_rejection {
        return error(StatusCode::BAD_REQUEST, message);
    }
    if body["title"].as_str().is_none_or(str::is_empty) {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "Title is required" })))
            .into_response();
    }

    body["_id"] = json!(Uuid::new_v4().simple().to_string());
    store.projects.push(body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn list_certifications(State(inner): Shared) -> Json<Vec<Value>> {
    inner.certification_fetches.fetch_add(1, Ordering::SeqCst);
    Json(inner.store.lock().await.certifications.clone())
}

async fn create_certification(
    State(inner): Shared,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    let mut fields = HashMap::new();
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                let name = field.name().unwrap_or_default().to_string();
                let value = match field.file_name() {
                    Some(file_name) => format!("https://cdn.example.com/{file_name}"),
                    None => field.text().await.unwrap_or_default(),
                };
                fields.insert(name, value);
            }
            Ok(None) => break,
            Err(e) => return error(StatusCode::BAD_REQUEST, &e.body_text()),
        }
    }

    let mut store = inner.store.lock().await;
    if !is_signed_in(&store, &headers) {
        return error(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    if let Some(message) = &store.create_rejection {
        return error(StatusCode::BAD_REQUEST, message);
    }
    let required = ["title", "platform", "year", "image", "pdf"];
    if required.iter().any(|name| !fields.contains_key(*name)) {
        return error(StatusCode::BAD_REQUEST, "All fields are required");
    }

    let record = json!({
        "_id": Uuid::new_v4().simple().to_string(),
        "title": fields["title"],
        "platform": fields["platform"],
        "year": fields["year"].parse::<u32>().map_or_else(|_| json!(fields["year"]), |y| json!(y)),
        "image": fields["image"],
        "pdf": fields["pdf"],
    });
    store.certifications.push(record.clone());
    (StatusCode::CREATED, Json(record)).into_response()
}

async fn send_contact(State(inner): Shared, Json(body): Json<Value>) -> Response {
    if body["message"].as_str().is_some_and(|m| m.contains("fail")) {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "Mailer unavailable");
    }
    inner.store.lock().await.contact_messages.push(body);
    Json(json!({ "message": "Thanks, talk soon!" })).into_response()
}
