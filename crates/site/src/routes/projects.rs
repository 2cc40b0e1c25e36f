//! Project creation route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    response::{IntoResponse, Response},
};
use portfolio_core::{ContentItem, Project};
use tracing::{info, instrument, warn};

use super::{require_admin, retarget};
use crate::error::{Result, add_breadcrumb};
use crate::middleware::CurrentVisitor;
use crate::resources::ProjectDraft;
use crate::visitor::Card;

/// State of the "Add Project" modal.
#[derive(Debug, Clone, Default)]
pub struct ProjectModal {
    pub draft: ProjectDraft,
    pub error: Option<String>,
    pub open: bool,
    /// Rendered as an out-of-band swap.
    pub oob: bool,
}

impl ProjectModal {
    /// Hidden, with an empty draft.
    #[must_use]
    pub fn closed() -> Self {
        Self::default()
    }

    /// Still open, keeping what the admin typed.
    #[must_use]
    pub fn failed(draft: ProjectDraft, error: String) -> Self {
        Self {
            draft,
            error: Some(error),
            open: true,
            oob: false,
        }
    }
}

/// Appended card, plus the modal reset and the empty placeholder removed.
#[derive(Template, WebTemplate)]
#[template(path = "fragments/project_created.html")]
pub struct ProjectCreatedTemplate {
    pub card: Card<Project>,
    pub was_first: bool,
    pub project_modal: ProjectModal,
}

/// The modal re-rendered in place with an error.
#[derive(Template, WebTemplate)]
#[template(path = "fragments/project_modal.html")]
pub struct ProjectModalTemplate {
    pub project_modal: ProjectModal,
}

/// Create a project.
///
/// POST /projects
///
/// On success the backend's echo is appended to the grid (no refetch). On
/// failure nothing is appended and the modal stays open with the draft.
#[instrument(skip_all)]
pub async fn create(
    CurrentVisitor(visitor): CurrentVisitor,
    Form(draft): Form<ProjectDraft>,
) -> Result<Response> {
    require_admin(&visitor)?;

    match visitor.create_project(&draft).await {
        Ok(appended) => {
            let key = appended.card.item.key().to_string();
            info!(key = %key, "Project added");
            add_breadcrumb("projects", "Project created", Some(&[("key", &key)]));
            Ok(ProjectCreatedTemplate {
                card: appended.card,
                was_first: appended.was_first,
                project_modal: ProjectModal {
                    oob: true,
                    ..ProjectModal::closed()
                },
            }
            .into_response())
        }
        Err(e) => {
            warn!(error = %e, "Project creation failed");
            let message = e.user_message(Project::KIND);
            Ok(retarget(
                "#project-modal",
                ProjectModalTemplate {
                    project_modal: ProjectModal::failed(draft, message),
                },
            ))
        }
    }
}
