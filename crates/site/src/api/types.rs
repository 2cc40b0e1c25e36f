//! Request and response payloads exchanged with the backend.

use portfolio_core::{AdminIdentity, Email};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};

/// `GET /auth/verify` response.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub admin: Option<AdminIdentity>,
    #[serde(default)]
    pub token: Option<String>,
}

/// Email/password pair for `POST /auth/login`.
///
/// The password is kept secret in memory and in `Debug` output; it is only
/// exposed while serializing the request body.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    #[serde(serialize_with = "expose_password")]
    pub password: SecretString,
}

fn expose_password<S: Serializer>(password: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(password.expose_secret())
}

/// `POST /auth/login` success response.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(rename = "isAdmin", default)]
    pub is_admin: bool,
    #[serde(default)]
    pub admin: Option<AdminIdentity>,
    #[serde(default)]
    pub token: Option<String>,
}

/// Error payload returned with non-success statuses.
///
/// Auth endpoints use `message`, the project endpoint uses `error`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    #[must_use]
    pub fn into_message(self) -> Option<String> {
        let nonblank = |m: &String| !m.trim().is_empty();
        self.message
            .filter(nonblank)
            .or_else(|| self.error.filter(nonblank))
    }
}

/// `POST /projects` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub tech: Vec<String>,
    pub github: String,
    pub demo: String,
    pub sample_video: String,
}

/// An uploaded file carried through to the backend.
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for Attachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attachment")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// `POST /certifications/add` multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCertification {
    pub title: String,
    pub platform: String,
    pub year: String,
    pub image: Attachment,
    pub pdf: Attachment,
}

/// `POST /contact/send` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: Email,
    pub message: String,
}

/// `POST /contact/send` success response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactReceipt {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_credentials_serialize_password_but_debug_hides_it() {
        let credentials = Credentials {
            email: "admin@example.com".to_string(),
            password: SecretString::from("hunter22"),
        };

        let body = serde_json::to_value(&credentials).unwrap();
        assert_eq!(body, json!({ "email": "admin@example.com", "password": "hunter22" }));
        assert!(!format!("{credentials:?}").contains("hunter22"));
    }

    #[test]
    fn test_login_response_defaults_is_admin_to_false() {
        let response: LoginResponse =
            serde_json::from_value(json!({ "admin": { "email": "a@example.com" } })).unwrap();
        assert!(!response.is_admin);
        assert!(response.admin.is_some());
    }

    #[test]
    fn test_new_project_uses_backend_field_names() {
        let project = NewProject {
            title: "X".to_string(),
            description: "d".to_string(),
            tech: vec!["Go".to_string()],
            github: "https://github.com/x".to_string(),
            demo: "#".to_string(),
            sample_video: String::new(),
        };
        let body = serde_json::to_value(&project).unwrap();
        assert_eq!(body["sampleVideo"], json!(""));
        assert_eq!(body["tech"], json!(["Go"]));
    }

    #[test]
    fn test_error_body_message_then_error() {
        let body: ErrorBody = serde_json::from_value(json!({ "error": "title required" })).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("title required"));

        let body: ErrorBody = serde_json::from_value(json!({ "message": " " })).unwrap();
        assert_eq!(body.into_message(), None);
    }

    #[test]
    fn test_error_body_blank_message_falls_through_to_error() {
        let body: ErrorBody =
            serde_json::from_value(json!({ "message": " ", "error": "title required" })).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("title required"));

        let body: ErrorBody =
            serde_json::from_value(json!({ "message": "Duplicate", "error": "ignored" })).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("Duplicate"));
    }
}
