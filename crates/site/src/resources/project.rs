//! Projects section.

use portfolio_core::{Project, content::NO_DEMO};
use serde::Deserialize;

use super::{DraftError, Section};
use crate::api::{ApiError, NewProject, PortfolioApi};

/// The projects section.
#[derive(Debug, Clone, Copy)]
pub struct Projects;

/// "Add Project" modal input, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProjectDraft {
    pub title: String,
    pub description: String,
    /// Comma-separated tech stack, e.g. `Go, Rust`.
    pub tech: String,
    pub github: String,
    pub demo: String,
    pub sample_video: String,
}

impl ProjectDraft {
    /// Tech tags: split on commas, trimmed, empties dropped.
    #[must_use]
    pub fn tech_tags(&self) -> Vec<String> {
        self.tech
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl Section for Projects {
    type Item = Project;
    type Draft = ProjectDraft;
    type Payload = NewProject;

    const NAME: &'static str = "projects";
    const EMPTY_MESSAGE: &'static str = "No projects found.";

    fn validate(draft: &ProjectDraft) -> Result<NewProject, DraftError> {
        let tech = draft.tech_tags();

        let missing: Vec<&str> = [
            ("Title", draft.title.trim().is_empty()),
            ("GitHub URL", draft.github.trim().is_empty()),
            ("Tech Stack", tech.is_empty()),
        ]
        .into_iter()
        .filter_map(|(label, is_missing)| is_missing.then_some(label))
        .collect();

        if !missing.is_empty() {
            return Err(DraftError::Incomplete(format!(
                "Please fill in: {}",
                missing.join(", ")
            )));
        }

        let demo = draft.demo.trim();
        Ok(NewProject {
            title: draft.title.trim().to_string(),
            description: draft.description.trim().to_string(),
            tech,
            github: draft.github.trim().to_string(),
            demo: if demo.is_empty() { NO_DEMO } else { demo }.to_string(),
            sample_video: draft.sample_video.trim().to_string(),
        })
    }

    async fn fetch<A: PortfolioApi>(api: &A) -> Result<Vec<Project>, ApiError> {
        api.list_projects().await
    }

    async fn create<A: PortfolioApi>(api: &A, payload: NewProject) -> Result<Project, ApiError> {
        api.create_project(&payload).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_tech_tags_are_trimmed_and_filtered() {
        let draft = ProjectDraft {
            tech: " Go,  Rust ,, ".to_string(),
            ..ProjectDraft::default()
        };
        assert_eq!(draft.tech_tags(), vec!["Go", "Rust"]);
    }

    #[test]
    fn test_validate_applies_defaults() {
        let draft = ProjectDraft {
            title: " X ".to_string(),
            github: "https://github.com/example/x".to_string(),
            tech: "Go, Rust".to_string(),
            ..ProjectDraft::default()
        };

        let payload = Projects::validate(&draft).unwrap();

        assert_eq!(payload.title, "X");
        assert_eq!(payload.description, "");
        assert_eq!(payload.demo, "#");
        assert_eq!(payload.sample_video, "");
        assert_eq!(payload.tech, vec!["Go", "Rust"]);
    }

    #[test]
    fn test_validate_lists_missing_fields() {
        let draft = ProjectDraft {
            title: "X".to_string(),
            tech: " , ".to_string(),
            ..ProjectDraft::default()
        };

        let err = Projects::validate(&draft).unwrap_err();
        assert_eq!(
            err,
            DraftError::Incomplete("Please fill in: GitHub URL, Tech Stack".to_string())
        );
    }

    #[test]
    fn test_form_fields_deserialize() {
        let draft: ProjectDraft = serde_json::from_value(serde_json::json!({
            "title": "X",
            "sample_video": "https://video.example.com"
        }))
        .unwrap();
        assert_eq!(draft.sample_video, "https://video.example.com");
        assert!(draft.github.is_empty());
    }
}
