//! Admin login form submission.

use std::sync::{Mutex, MutexGuard, PoisonError};

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, instrument, warn};

use super::SessionStore;
use crate::api::{Credentials, LoginResponse, PortfolioApi};

pub const NOT_ADMIN_MESSAGE: &str = "Not authorized as admin.";
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed";
pub const MISSING_FIELDS_MESSAGE: &str = "Email and password are required.";
pub const IN_PROGRESS_MESSAGE: &str = "Login already in progress.";

/// Where the login form currently is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoginState {
    #[default]
    Idle,
    /// A request is in flight; further submits are refused.
    Submitting,
    Success,
    Failed(String),
}

/// Result of one submit, for the caller to render or redirect on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// The session store now holds the admin; navigate home.
    Authenticated,
    /// Show this message next to the form; resubmission is allowed.
    Rejected(String),
}

/// Drives `Idle -> Submitting -> {Success, Failed}` for the login form.
///
/// There is no attempt limit; after `Failed` the next submit starts over.
#[derive(Debug, Default)]
pub struct CredentialSubmitter {
    state: Mutex<LoginState>,
}

/// Holds `Submitting` for one request.
///
/// Dropped without [`settle`](Self::settle) (the request future was
/// cancelled), it puts the form back to `Idle`.
struct InFlight<'a> {
    state: &'a Mutex<LoginState>,
    settled: bool,
}

impl InFlight<'_> {
    fn settle(mut self, state: LoginState) {
        *lock(self.state) = state;
        self.settled = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut state = lock(self.state);
        if *state == LoginState::Submitting {
            debug!("Login request abandoned; form reset");
            *state = LoginState::Idle;
        }
    }
}

fn lock(state: &Mutex<LoginState>) -> MutexGuard<'_, LoginState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl CredentialSubmitter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> LoginState {
        lock(&self.state).clone()
    }

    /// Whether the submit control should be rendered disabled.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        matches!(*lock(&self.state), LoginState::Submitting)
    }

    fn begin(&self) -> Option<InFlight<'_>> {
        let mut state = lock(&self.state);
        if *state == LoginState::Submitting {
            return None;
        }
        *state = LoginState::Submitting;
        Some(InFlight {
            state: &self.state,
            settled: false,
        })
    }

    /// Submit credentials to the backend and update `store` on success.
    ///
    /// Only an identity flagged as admin signs the visitor in. A valid login
    /// for a non-admin account is refused, and the backend session it
    /// created is ended so no authenticated cookie outlives the refusal.
    #[instrument(skip(self, api, store, password))]
    pub async fn submit<A: PortfolioApi>(
        &self,
        api: &A,
        store: &SessionStore,
        email: &str,
        password: SecretString,
    ) -> LoginOutcome {
        let email = email.trim();
        if email.is_empty() || password.expose_secret().is_empty() {
            *lock(&self.state) = LoginState::Failed(MISSING_FIELDS_MESSAGE.to_string());
            return LoginOutcome::Rejected(MISSING_FIELDS_MESSAGE.to_string());
        }

        let Some(in_flight) = self.begin() else {
            return LoginOutcome::Rejected(IN_PROGRESS_MESSAGE.to_string());
        };

        let credentials = Credentials {
            email: email.to_string(),
            password,
        };

        let message = match api.login(&credentials).await {
            Ok(LoginResponse {
                is_admin: true,
                admin: Some(admin),
                token,
            }) => {
                info!(admin = %admin.display_name(), "Admin logged in");
                store.login_success(admin, token.map(SecretString::from));
                in_flight.settle(LoginState::Success);
                return LoginOutcome::Authenticated;
            }
            Ok(LoginResponse { is_admin: true, .. }) => {
                warn!("Login response flagged admin but carried no identity");
                LOGIN_FAILED_MESSAGE.to_string()
            }
            Ok(LoginResponse { .. }) => {
                warn!("Login succeeded for a non-admin account");
                if let Err(e) = api.logout().await {
                    warn!(error = %e, "Failed to end non-admin backend session");
                }
                NOT_ADMIN_MESSAGE.to_string()
            }
            Err(e) => {
                warn!(error = %e, "Login failed");
                e.user_message(LOGIN_FAILED_MESSAGE)
            }
        };

        in_flight.settle(LoginState::Failed(message.clone()));
        LoginOutcome::Rejected(message)
    }
}
