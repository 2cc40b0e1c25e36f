//! Newtype IDs for type-safe references to backend records.
//!
//! The backend assigns opaque string identifiers (document ids). Use the
//! `define_id!` macro to create wrappers that prevent accidentally mixing
//! a project id with a certification id.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`
/// - `Display` and `From<&str>`/`From<String>` implementations
///
/// # Example
///
/// ```rust
/// # use portfolio_core::define_id;
/// define_id!(ProjectId);
/// define_id!(CertificationId);
///
/// let project = ProjectId::new("66a1f0");
/// let cert = CertificationId::new("66a1f0");
///
/// // Same text, different types, so this won't compile:
/// // let _: ProjectId = cert;
/// assert_eq!(project.as_str(), cert.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from the backend's identifier text.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the identifier text.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

define_id!(ProjectId);
define_id!(CertificationId);
define_id!(AdminId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_is_transparent_in_json() {
        let id = ProjectId::new("665f1c2e9b");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"665f1c2e9b\"");

        let parsed: ProjectId = serde_json::from_str("\"665f1c2e9b\"").unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_display_matches_as_str() {
        let id = CertificationId::from("abc123");
        assert_eq!(id.to_string(), id.as_str());
    }
}
