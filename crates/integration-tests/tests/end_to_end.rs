//! Browser-level scenarios: the site router served against the fake backend.

#![allow(clippy::unwrap_used)]

use portfolio_core::Project;
use portfolio_integration_tests::{Account, FakeBackend, browser, spawn_site};
use reqwest::{
    StatusCode,
    header::{CONTENT_TYPE, LOCATION},
    multipart::{Form, Part},
};

const ADMIN_EMAIL: &str = "admin@example.com";
const ADMIN_PASSWORD: &str = "correct-horse";

async fn setup() -> (FakeBackend, String) {
    let backend = FakeBackend::start(vec![
        Account::admin(ADMIN_EMAIL, ADMIN_PASSWORD),
        Account::member("member@example.com", "member-pass"),
    ])
    .await;
    let site = spawn_site(&backend).await;
    (backend, site)
}

async fn get_home(client: &reqwest::Client, site: &str) -> String {
    let response = client.get(format!("{site}/")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    response.text().await.unwrap()
}

fn certification_form(title: &str) -> Form {
    Form::new()
        .text("title", title.to_string())
        .text("platform", "AWS")
        .text("year", "2024")
        .part(
            "image",
            Part::bytes(vec![0x89, b'P', b'N', b'G'])
                .file_name("badge.png")
                .mime_str("image/png")
                .unwrap(),
        )
        .part(
            "pdf",
            Part::bytes(b"%PDF-1.4".to_vec())
                .file_name("cert.pdf")
                .mime_str("application/pdf")
                .unwrap(),
        )
}

async fn login(client: &reqwest::Client, site: &str, email: &str, password: &str) -> reqwest::Response {
    client
        .post(format!("{site}/admin-login"))
        .form(&[("email", email), ("password", password)])
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_admin_session_lifecycle() {
    let (backend, site) = setup().await;
    let client = browser();

    // Guest view
    let html = get_home(&client, &site).await;
    assert!(html.contains("Admin/Login"));
    assert!(!html.contains("data-open-modal=\"project-modal\""));
    assert!(html.contains("id=\"projects-empty\""));
    assert_eq!(backend.project_fetches(), 1);
    assert_eq!(backend.certification_fetches(), 1);

    // Login
    let response = login(&client, &site, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/");
    assert_eq!(backend.session_count().await, 1);

    let html = get_home(&client, &site).await;
    assert!(html.contains("Logout"));
    assert!(html.contains("data-open-modal=\"project-modal\""));
    assert!(html.contains("data-open-modal=\"certification-modal\""));
    let fetches = backend.project_fetches();

    // Create: the echo is appended without refetching the collection
    let response = client
        .post(format!("{site}/projects"))
        .header("HX-Request", "true")
        .form(&[
            ("title", "Ray Tracer"),
            ("description", "Weekend project"),
            ("tech", "Rust, WGSL"),
            ("github", "https://github.com/example/ray-tracer"),
            ("demo", ""),
            ("sample_video", ""),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get("HX-Retarget").is_none());
    let fragment = response.text().await.unwrap();
    assert!(fragment.contains("Ray Tracer"));
    assert!(fragment.contains("WGSL"));
    assert!(fragment.contains("hx-swap-oob=\"delete\""));
    assert_eq!(backend.project_fetches(), fetches);

    let stored: Vec<Project> = backend
        .projects()
        .await
        .into_iter()
        .map(|value| serde_json::from_value(value).unwrap())
        .collect();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].tech, vec!["Rust", "WGSL"]);
    assert_eq!(stored[0].demo, "#");

    // A fresh load shows the stored project
    let html = get_home(&client, &site).await;
    assert!(html.contains("Ray Tracer"));
    assert!(!html.contains("id=\"projects-empty\""));

    // Logout
    let response = client.post(format!("{site}/logout")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(backend.session_count().await, 0);
    assert!(backend.logged_out().await.contains(ADMIN_EMAIL));

    let html = get_home(&client, &site).await;
    assert!(html.contains("Admin/Login"));
    assert!(html.contains("Ray Tracer"));
    assert!(!html.contains("data-open-modal=\"project-modal\""));
    assert!(!html.contains("data-open-modal=\"certification-modal\""));

    // The signed-out browser can no longer create
    let response = client
        .post(format!("{site}/projects"))
        .header("HX-Request", "true")
        .form(&[
            ("title", "After Logout"),
            ("tech", "Go"),
            ("github", "https://github.com/x/y"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(backend.projects().await.len(), 1);
}

#[tokio::test]
async fn test_htmx_login_redirects_to_home() {
    let (_backend, site) = setup().await;
    let client = browser();

    let response = client
        .post(format!("{site}/admin-login"))
        .header("HX-Request", "true")
        .form(&[("email", ADMIN_EMAIL), ("password", ADMIN_PASSWORD)])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["HX-Redirect"], "/");

    let html = get_home(&client, &site).await;
    assert!(html.contains("Logout"));
}

#[tokio::test]
async fn test_non_admin_login_is_refused() {
    let (backend, site) = setup().await;
    let client = browser();

    let response = login(&client, &site, "member@example.com", "member-pass").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let html = response.text().await.unwrap();
    assert!(html.contains("Not authorized as admin."));
    assert!(html.contains("member@example.com"));

    assert_eq!(backend.session_count().await, 0);
    assert!(backend.logged_out().await.contains("member@example.com"));

    let html = get_home(&client, &site).await;
    assert!(html.contains("Admin/Login"));
}

#[tokio::test]
async fn test_bad_credentials_show_backend_message() {
    let (_backend, site) = setup().await;
    let client = browser();

    let response = login(&client, &site, ADMIN_EMAIL, "wrong").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.text().await.unwrap().contains("Invalid credentials"));
}

#[tokio::test]
async fn test_guest_cannot_create_project() {
    let (backend, site) = setup().await;
    let client = browser();
    get_home(&client, &site).await;

    let response = client
        .post(format!("{site}/projects"))
        .form(&[
            ("title", "Sneaky"),
            ("tech", "Go"),
            ("github", "https://github.com/x/y"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(backend.projects().await.is_empty());
}

#[tokio::test]
async fn test_incomplete_project_keeps_modal_open() {
    let (backend, site) = setup().await;
    let client = browser();
    login(&client, &site, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    get_home(&client, &site).await;

    let response = client
        .post(format!("{site}/projects"))
        .form(&[("title", "Half Done"), ("github", ""), ("tech", "")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["HX-Retarget"], "#project-modal");
    let html = response.text().await.unwrap();
    assert!(html.contains("Please fill in: GitHub URL, Tech Stack"));
    assert!(html.contains("value=\"Half Done\""));
    assert!(backend.projects().await.is_empty());
}

#[tokio::test]
async fn test_certification_upload_appends_card() {
    let (backend, site) = setup().await;
    let client = browser();
    login(&client, &site, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    get_home(&client, &site).await;
    let fetches = backend.certification_fetches();

    let form = certification_form("Cloud Practitioner");

    let response = client
        .post(format!("{site}/certifications"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fragment = response.text().await.unwrap();
    assert!(fragment.contains("Cloud Practitioner"));
    assert!(fragment.contains("https://cdn.example.com/cert.pdf"));

    assert_eq!(backend.certifications().await.len(), 1);
    assert_eq!(backend.certification_fetches(), fetches);
}

#[tokio::test]
async fn test_rejected_certification_keeps_modal_open() {
    let (backend, site) = setup().await;
    let client = browser();
    login(&client, &site, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    get_home(&client, &site).await;
    backend.reject_creates("Storage quota exceeded").await;

    let response = client
        .post(format!("{site}/certifications"))
        .header("HX-Request", "true")
        .multipart(certification_form("Cloud Practitioner"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["HX-Retarget"], "#certification-modal");
    assert_eq!(response.headers()["HX-Reswap"], "outerHTML");
    let html = response.text().await.unwrap();
    assert!(html.contains("Failed to add certification: Storage quota exceeded"));
    assert!(html.contains("value=\"Cloud Practitioner\""));
    assert!(html.contains("class=\"modal\" open"));
    assert!(backend.certifications().await.is_empty());

    // Nothing was appended
    let html = get_home(&client, &site).await;
    assert!(html.contains("id=\"certifications-empty\""));
}

#[tokio::test]
async fn test_unreadable_upload_keeps_modal_open() {
    let (backend, site) = setup().await;
    let client = browser();
    login(&client, &site, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    get_home(&client, &site).await;

    // Stream ends before the closing boundary
    let body = "--XYZ\r\nContent-Disposition: form-data; name=\"title\"\r\n\r\nCloud";
    let response = client
        .post(format!("{site}/certifications"))
        .header("HX-Request", "true")
        .header(CONTENT_TYPE, "multipart/form-data; boundary=XYZ")
        .body(body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["HX-Retarget"], "#certification-modal");
    let html = response.text().await.unwrap();
    assert!(html.contains("Upload could not be read. Please try again."));
    assert!(backend.certifications().await.is_empty());
}

#[tokio::test]
async fn test_contact_form_reports_result() {
    let (backend, site) = setup().await;
    let client = browser();

    let response = client
        .post(format!("{site}/contact"))
        .form(&[
            ("name", "Ada"),
            ("email", "ada@example.com"),
            ("message", "Loved the ray tracer"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.text().await.unwrap().contains("Thanks, talk soon!"));
    assert_eq!(backend.contact_messages().await.len(), 1);

    let response = client
        .post(format!("{site}/contact"))
        .form(&[
            ("name", "Ada"),
            ("email", "ada@example.com"),
            ("message", "this should fail"),
        ])
        .send()
        .await
        .unwrap();
    let html = response.text().await.unwrap();
    assert!(html.contains("Mailer unavailable"));
    assert!(html.contains("this should fail"));
    assert_eq!(backend.contact_messages().await.len(), 1);
}
