//! Site navigation.

use portfolio_core::Session;

/// An in-page section link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavLink {
    /// Anchor id of the section.
    pub id: &'static str,
    pub label: &'static str,
}

/// Section links in page order.
pub const SECTION_LINKS: [NavLink; 7] = [
    NavLink { id: "home", label: "Home" },
    NavLink { id: "about", label: "About" },
    NavLink { id: "education", label: "Education" },
    NavLink { id: "skills", label: "Skills" },
    NavLink { id: "projects", label: "Projects" },
    NavLink { id: "certifications", label: "Certifications" },
    NavLink { id: "contact", label: "Contact" },
];

/// The navigation bar, derived from the visitor's session.
///
/// A guest gets an "Admin/Login" link; a signed-in admin gets the "Admin"
/// badge and a logout button instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nav {
    pub links: &'static [NavLink],
    /// Display name of the signed-in admin.
    pub admin: Option<String>,
}

impl Nav {
    #[must_use]
    pub fn for_session(session: &Session) -> Self {
        Self {
            links: &SECTION_LINKS,
            admin: session.admin().map(|a| a.display_name().to_string()),
        }
    }

    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.admin.is_some()
    }
}
