//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;
use portfolio_core::{Certification, Project};
use tracing::instrument;

use super::certifications::CertificationModal;
use super::contact::ContactForm;
use super::projects::ProjectModal;
use crate::filters;
use crate::middleware::CurrentVisitor;
use crate::nav::Nav;
use crate::visitor::{HomeSnapshot, SectionSnapshot};

// =============================================================================
// Static Sections
// =============================================================================

/// One row of the education timeline.
#[derive(Debug, Clone, Copy)]
pub struct EducationEntry {
    pub degree: &'static str,
    pub institution: &'static str,
    pub duration: &'static str,
    pub result: &'static str,
}

/// A named group of skills.
#[derive(Debug, Clone, Copy)]
pub struct SkillGroup {
    pub title: &'static str,
    pub skills: &'static [&'static str],
}

pub const EDUCATION: &[EducationEntry] = &[
    EducationEntry {
        degree: "B.Tech in CSE (AI & ML)",
        institution: "University of Engineering and Management, Kolkata",
        duration: "2022 – 2026",
        result: "CGPA: 8.68 (Up to 6th Sem)",
    },
    EducationEntry {
        degree: "Higher Secondary (Class 12)",
        institution: "New Alipore Multipurpose School",
        duration: "2022",
        result: "Percentage: 83%",
    },
    EducationEntry {
        degree: "Secondary (Class 10)",
        institution: "New Alipore Multipurpose School",
        duration: "2020",
        result: "Percentage: 88%",
    },
];

pub const SKILLS: &[SkillGroup] = &[
    SkillGroup {
        title: "Programming Languages",
        skills: &["Java", "JavaScript", "C", "Python"],
    },
    SkillGroup {
        title: "Frontend Development",
        skills: &["HTML5", "CSS3", "React.js", "Redux", "Tailwind CSS"],
    },
    SkillGroup {
        title: "Backend & APIs",
        skills: &["Node.js", "Express.js", "JWT", "Nodemailer", "Razorpay"],
    },
    SkillGroup {
        title: "Database",
        skills: &["MongoDB"],
    },
    SkillGroup {
        title: "Dev Tools",
        skills: &["Git", "Postman", "npm"],
    },
];

// =============================================================================
// Templates
// =============================================================================

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    pub nav: Nav,
    pub is_admin: bool,
    pub projects: SectionSnapshot<Project>,
    pub certifications: SectionSnapshot<Certification>,
    pub project_modal: ProjectModal,
    pub certification_modal: CertificationModal,
    pub contact_form: ContactForm,
    pub education: &'static [EducationEntry],
    pub skills: &'static [SkillGroup],
}

impl From<HomeSnapshot> for HomeTemplate {
    fn from(home: HomeSnapshot) -> Self {
        Self {
            nav: home.nav,
            is_admin: home.is_admin,
            projects: home.projects,
            certifications: home.certifications,
            project_modal: ProjectModal::closed(),
            certification_modal: CertificationModal::closed(),
            contact_form: ContactForm::default(),
            education: EDUCATION,
            skills: SKILLS,
        }
    }
}

// =============================================================================
// Routes
// =============================================================================

/// Display the home page.
///
/// Every full load is a fresh mount of the page.
#[instrument(skip_all)]
pub async fn home(CurrentVisitor(visitor): CurrentVisitor) -> impl IntoResponse {
    HomeTemplate::from(visitor.mount().await)
}
