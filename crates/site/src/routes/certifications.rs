//! Certification upload route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, multipart::MultipartError},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use portfolio_core::{Certification, ContentItem};
use tracing::{info, instrument, warn};

use super::{MAX_UPLOAD_BYTES, require_admin, retarget};
use crate::api::Attachment;
use crate::error::{Result, add_breadcrumb};
use crate::middleware::CurrentVisitor;
use crate::resources::CertificationDraft;
use crate::visitor::Card;

/// State of the "Add Certification" modal.
///
/// Only the text fields survive a failed attempt; browsers never prefill
/// file inputs.
#[derive(Debug, Clone, Default)]
pub struct CertificationModal {
    pub title: String,
    pub platform: String,
    pub year: String,
    pub error: Option<String>,
    pub open: bool,
    pub oob: bool,
}

impl CertificationModal {
    #[must_use]
    pub fn closed() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn failed(draft: &CertificationDraft, error: String) -> Self {
        Self {
            title: draft.title.clone(),
            platform: draft.platform.clone(),
            year: draft.year.clone(),
            error: Some(error),
            open: true,
            oob: false,
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "fragments/certification_created.html")]
pub struct CertificationCreatedTemplate {
    pub card: Card<Certification>,
    pub was_first: bool,
    pub certification_modal: CertificationModal,
}

#[derive(Template, WebTemplate)]
#[template(path = "fragments/certification_modal.html")]
pub struct CertificationModalTemplate {
    pub certification_modal: CertificationModal,
}

/// Collect the multipart form into `draft`.
///
/// Parts with a file name are files, everything else is text. Fields read
/// before a failure stay in `draft`.
async fn read_draft(
    mut multipart: Multipart,
    draft: &mut CertificationDraft,
) -> std::result::Result<(), MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if let Some(file_name) = field.file_name().map(str::to_string) {
            let content_type = field.content_type().map(str::to_string);
            let bytes = field.bytes().await?;
            draft.set_file(
                &name,
                Attachment {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                },
            );
        } else {
            let value = field.text().await?;
            draft.set_text(&name, value);
        }
    }

    Ok(())
}

/// Modal message for an upload the site could not read.
fn upload_error_message(error: &MultipartError) -> String {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        format!(
            "Upload is too large ({} MB max).",
            MAX_UPLOAD_BYTES / (1024 * 1024)
        )
    } else {
        "Upload could not be read. Please try again.".to_string()
    }
}

fn failed_modal(draft: &CertificationDraft, message: String) -> Response {
    retarget(
        "#certification-modal",
        CertificationModalTemplate {
            certification_modal: CertificationModal::failed(draft, message),
        },
    )
}

/// Upload a certification.
///
/// POST /certifications (multipart: title, platform, year, image, pdf)
#[instrument(skip_all)]
pub async fn create(
    CurrentVisitor(visitor): CurrentVisitor,
    multipart: Multipart,
) -> Result<Response> {
    require_admin(&visitor)?;
    let mut draft = CertificationDraft::default();
    if let Err(e) = read_draft(multipart, &mut draft).await {
        warn!(error = %e.body_text(), status = %e.status(), "Certification upload unreadable");
        return Ok(failed_modal(&draft, upload_error_message(&e)));
    }

    match visitor.create_certification(&draft).await {
        Ok(appended) => {
            let key = appended.card.item.key().to_string();
            info!(key = %key, "Certification added");
            add_breadcrumb("certifications", "Certification created", Some(&[("key", &key)]));
            Ok(CertificationCreatedTemplate {
                card: appended.card,
                was_first: appended.was_first,
                certification_modal: CertificationModal {
                    oob: true,
                    ..CertificationModal::closed()
                },
            }
            .into_response())
        }
        Err(e) => {
            warn!(error = %e, "Certification upload failed");
            Ok(failed_modal(&draft, e.user_message(Certification::KIND)))
        }
    }
}
