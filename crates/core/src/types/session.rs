//! Client-side belief about the admin session.

use secrecy::SecretString;

use super::admin::AdminIdentity;

/// Whether an authenticated admin is active for this visitor.
///
/// The authenticated flag is derived from the presence of an admin identity,
/// so a session can never claim to be authenticated without one. The only
/// ways to change a session are [`Session::login_success`] and
/// [`Session::logout`].
///
/// ```
/// use portfolio_core::{AdminIdentity, Session};
///
/// let admin: AdminIdentity = serde_json::from_str(r#"{"email":"me@example.com"}"#).unwrap();
///
/// let mut session = Session::default();
/// assert!(!session.is_authenticated());
///
/// session.login_success(admin, None);
/// assert!(session.is_authenticated());
///
/// session.logout();
/// assert!(session.admin().is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Session {
    admin: Option<AdminIdentity>,
    token: Option<SecretString>,
}

impl Session {
    /// Mark the session authenticated with the given identity and token.
    ///
    /// No validation happens here; callers decide whether the identity is
    /// an admin before calling.
    pub fn login_success(&mut self, admin: AdminIdentity, token: Option<SecretString>) {
        self.admin = Some(admin);
        self.token = token;
    }

    /// Reset to the unauthenticated default.
    pub fn logout(&mut self) {
        self.admin = None;
        self.token = None;
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.admin.is_some()
    }

    #[must_use]
    pub const fn admin(&self) -> Option<&AdminIdentity> {
        self.admin.as_ref()
    }

    #[must_use]
    pub const fn token(&self) -> Option<&SecretString> {
        self.token.as_ref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    fn admin(email: &str) -> AdminIdentity {
        serde_json::from_value(serde_json::json!({ "email": email })).unwrap()
    }

    fn assert_invariant(session: &Session) {
        assert_eq!(session.is_authenticated(), session.admin().is_some());
    }

    #[test]
    fn test_default_is_unauthenticated() {
        let session = Session::default();
        assert!(!session.is_authenticated());
        assert!(session.token().is_none());
    }

    #[test]
    fn test_login_then_logout() {
        let mut session = Session::default();
        session.login_success(admin("a@example.com"), Some(SecretString::from("tok")));
        assert!(session.is_authenticated());
        assert_eq!(session.token().unwrap().expose_secret(), "tok");

        session.logout();
        assert!(!session.is_authenticated());
        assert!(session.token().is_none());
    }

    #[test]
    fn test_invariant_holds_for_every_transition_sequence() {
        // Every sequence of up to 6 transitions, encoded as bits.
        for len in 0..=6u32 {
            for bits in 0..(1u32 << len) {
                let mut session = Session::default();
                assert_invariant(&session);
                for step in 0..len {
                    if bits & (1 << step) == 0 {
                        session.login_success(admin("a@example.com"), None);
                    } else {
                        session.logout();
                    }
                    assert_invariant(&session);
                }
            }
        }
    }

    #[test]
    fn test_relogin_replaces_identity_and_token() {
        let mut session = Session::default();
        session.login_success(admin("first@example.com"), Some(SecretString::from("one")));
        session.login_success(admin("second@example.com"), None);

        assert_eq!(
            session.admin().unwrap().email.as_deref(),
            Some("second@example.com")
        );
        assert!(session.token().is_none());
    }
}
