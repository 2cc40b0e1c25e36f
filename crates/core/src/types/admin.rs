//! Admin identity returned by the backend.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id::AdminId;

/// Identity of the signed-in administrator.
///
/// The backend owns this record; the site only displays it and never mutates
/// it in place. Known fields are lifted out for convenience, everything else
/// is preserved verbatim in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminIdentity {
    #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AdminId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AdminIdentity {
    /// Best human-readable label: name, then email, then id.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .or_else(|| self.id.as_ref().map(AdminId::as_str))
            .unwrap_or("Admin")
    }
}
