//! Displayable content records: projects and certifications.
//!
//! Both are owned by the backend; the site renders them and appends the
//! backend's echo of newly created records.

use serde::{Deserialize, Deserializer, Serialize};

use super::id::{CertificationId, ProjectId};

/// A record that can be rendered as a card in a content section.
///
/// `key` must be unique within one collection; it doubles as the animation
/// key for the card.
pub trait ContentItem {
    /// Lower-case singular noun used in messages ("project").
    const KIND: &'static str;

    fn key(&self) -> &str;

    fn title(&self) -> &str;

    /// Text fields shown on the card, in display order.
    fn display_fields(&self) -> Vec<(&'static str, &str)>;

    /// Links to external media (images, documents, videos) referenced by the card.
    fn media_refs(&self) -> Vec<&str>;
}

/// Placeholder the backend stores for "no live demo".
pub const NO_DEMO: &str = "#";

/// A portfolio project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "_id", alias = "id")]
    pub id: ProjectId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tech: Vec<String>,
    #[serde(default)]
    pub github: String,
    #[serde(default)]
    pub demo: String,
    #[serde(default)]
    pub sample_video: String,
}

impl Project {
    /// Live demo link, if the project has one.
    #[must_use]
    pub fn demo_link(&self) -> Option<&str> {
        let demo = self.demo.trim();
        (!demo.is_empty() && demo != NO_DEMO).then_some(demo)
    }

    /// Demo video link, if the project has one.
    #[must_use]
    pub fn video_link(&self) -> Option<&str> {
        let video = self.sample_video.trim();
        (!video.is_empty()).then_some(video)
    }
}

impl ContentItem for Project {
    const KIND: &'static str = "project";

    fn key(&self) -> &str {
        self.id.as_str()
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn display_fields(&self) -> Vec<(&'static str, &str)> {
        vec![("title", &self.title), ("description", &self.description)]
    }

    fn media_refs(&self) -> Vec<&str> {
        let mut refs = vec![self.github.as_str()];
        refs.extend(self.demo_link());
        refs.extend(self.video_link());
        refs.retain(|r| !r.is_empty());
        refs
    }
}

/// A certification with its badge image and certificate document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certification {
    #[serde(rename = "_id", alias = "id")]
    pub id: CertificationId,
    pub title: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub year: String,
    /// Badge image URL.
    #[serde(default)]
    pub image: String,
    /// Certificate PDF URL.
    #[serde(default)]
    pub pdf: String,
}

impl ContentItem for Certification {
    const KIND: &'static str = "certification";

    fn key(&self) -> &str {
        self.id.as_str()
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn display_fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("title", &self.title),
            ("platform", &self.platform),
            ("year", &self.year),
        ]
    }

    fn media_refs(&self) -> Vec<&str> {
        [self.image.as_str(), self.pdf.as_str()]
            .into_iter()
            .filter(|r| !r.is_empty())
            .collect()
    }
}

/// Accept `2024` as well as `"2024"`; the backend has stored both.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}
