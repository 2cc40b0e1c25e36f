//! Certifications section.

use portfolio_core::Certification;

use super::{DraftError, Section};
use crate::api::{ApiError, Attachment, NewCertification, PortfolioApi};

pub const ALL_FIELDS_REQUIRED: &str = "All fields are required!";

/// The certifications section.
#[derive(Debug, Clone, Copy)]
pub struct Certifications;

/// "Add Certification" modal input.
///
/// Files arrive as multipart parts; a file input left empty by the browser
/// is recorded as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CertificationDraft {
    pub title: String,
    pub platform: String,
    pub year: String,
    pub image: Option<Attachment>,
    pub pdf: Option<Attachment>,
}

impl CertificationDraft {
    /// Record a text field by its form name; unknown names are ignored.
    pub fn set_text(&mut self, name: &str, value: String) {
        match name {
            "title" => self.title = value,
            "platform" => self.platform = value,
            "year" => self.year = value,
            _ => {}
        }
    }

    /// Record a file field by its form name; empty uploads count as absent.
    pub fn set_file(&mut self, name: &str, attachment: Attachment) {
        let attachment = (!attachment.bytes.is_empty()).then_some(attachment);
        match name {
            "image" => self.image = attachment,
            "pdf" => self.pdf = attachment,
            _ => {}
        }
    }
}

fn content_type_is(attachment: &Attachment, accepted: impl Fn(&str) -> bool) -> bool {
    attachment
        .content_type
        .as_deref()
        .is_none_or(|ct| accepted(&ct.to_ascii_lowercase()))
}

impl Section for Certifications {
    type Item = Certification;
    type Draft = CertificationDraft;
    type Payload = NewCertification;

    const NAME: &'static str = "certifications";
    const EMPTY_MESSAGE: &'static str = "No certifications found.";

    fn validate(draft: &CertificationDraft) -> Result<NewCertification, DraftError> {
        let title = draft.title.trim();
        let platform = draft.platform.trim();
        let year = draft.year.trim();

        let (Some(image), Some(pdf)) = (&draft.image, &draft.pdf) else {
            return Err(DraftError::Incomplete(ALL_FIELDS_REQUIRED.to_string()));
        };
        if title.is_empty() || platform.is_empty() || year.is_empty() {
            return Err(DraftError::Incomplete(ALL_FIELDS_REQUIRED.to_string()));
        }

        if !content_type_is(image, |ct| ct.starts_with("image/")) {
            return Err(DraftError::Invalid(
                "The badge must be an image (JPG/PNG).".to_string(),
            ));
        }
        if !content_type_is(pdf, |ct| ct == "application/pdf") {
            return Err(DraftError::Invalid(
                "The certificate must be a PDF.".to_string(),
            ));
        }

        Ok(NewCertification {
            title: title.to_string(),
            platform: platform.to_string(),
            year: year.to_string(),
            image: image.clone(),
            pdf: pdf.clone(),
        })
    }

    async fn fetch<A: PortfolioApi>(api: &A) -> Result<Vec<Certification>, ApiError> {
        api.list_certifications().await
    }

    async fn create<A: PortfolioApi>(
        api: &A,
        payload: NewCertification,
    ) -> Result<Certification, ApiError> {
        api.create_certification(payload).await
    }
}
