//! Admin session state for one visitor.
//!
//! [`SessionStore`] holds the visitor's [`Session`]; it is written only by
//! the verifier ([`verify_session`]), the credential submitter
//! ([`CredentialSubmitter`]) and the logout action ([`sign_out`]).
//! Everything else reads it at render time (nav badge, "Add" controls), so a
//! page always reflects the session as of that request.

mod credentials;
mod verifier;

use std::sync::{Arc, PoisonError, RwLock};

use portfolio_core::{AdminIdentity, Session};
use secrecy::SecretString;
use tracing::{info, instrument, warn};

use crate::api::PortfolioApi;

pub use credentials::{CredentialSubmitter, LoginOutcome, LoginState};
pub use verifier::verify_session;

/// Injectable container for the visitor's session.
///
/// Cloning yields another handle to the same session.
#[derive(Clone, Debug)]
pub struct SessionStore {
    session: Arc<RwLock<Session>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// Create a store holding the unauthenticated default.
    #[must_use]
    pub fn new() -> Self {
        Self {
            session: Arc::new(RwLock::new(Session::default())),
        }
    }

    /// Snapshot of the current session.
    #[must_use]
    pub fn current(&self) -> Session {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_authenticated()
    }

    pub fn login_success(&self, admin: AdminIdentity, token: Option<SecretString>) {
        self.session
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .login_success(admin, token);
    }

    pub fn logout(&self) {
        self.session
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .logout();
    }
}

/// Explicit logout action from the nav.
///
/// The backend session is ended best-effort; the local session is reset
/// whether or not the backend call succeeds, so the visitor never keeps
/// admin controls after asking to leave.
#[instrument(skip_all)]
pub async fn sign_out<A: PortfolioApi>(api: &A, store: &SessionStore) {
    match api.logout().await {
        Ok(()) => info!("Admin logged out"),
        Err(e) => warn!(error = %e, "Backend logout failed; clearing local session anyway"),
    }
    store.logout();
}
