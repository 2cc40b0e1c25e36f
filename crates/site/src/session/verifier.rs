//! Start-of-load session reconciliation.

use secrecy::SecretString;
use tracing::{debug, instrument};

use super::SessionStore;
use crate::api::{PortfolioApi, VerifyResponse};

/// Ask the backend whether the visitor's cookie is a valid admin session and
/// reconcile the answer into `store`.
///
/// Exactly one request is made. Anything other than `success: true` with an
/// admin identity (network failure, error status, malformed payload, or an
/// explicit "not authenticated") resets the store to the unauthenticated
/// default; nothing is surfaced to the visitor. Returns whether the visitor
/// ended up authenticated.
#[instrument(skip_all)]
pub async fn verify_session<A: PortfolioApi>(api: &A, store: &SessionStore) -> bool {
    match api.verify_session().await {
        Ok(VerifyResponse {
            success: true,
            admin: Some(admin),
            token,
        }) => {
            debug!(admin = %admin.display_name(), "Session verified");
            store.login_success(admin, token.map(SecretString::from));
            true
        }
        Ok(response) => {
            debug!(
                success = response.success,
                has_admin = response.admin.is_some(),
                "No admin session"
            );
            store.logout();
            false
        }
        Err(e) => {
            debug!(error = %e, "Session verification failed; treating as signed out");
            store.logout();
            false
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::api::fake::{FakeApi, Reply, admin};

    #[tokio::test]
    async fn test_valid_session_logs_in() {
        let api = FakeApi::signed_in("owner@example.com");
        let store = SessionStore::new();

        assert!(verify_session(&api, &store).await);

        let session = store.current();
        assert!(session.is_authenticated());
        assert_eq!(
            session.admin().unwrap().email.as_deref(),
            Some("owner@example.com")
        );
        assert!(session.token().is_some());
    }

    #[tokio::test]
    async fn test_explicit_not_authenticated_logs_out() {
        let api = FakeApi::default();
        let store = SessionStore::new();
        store.login_success(admin("stale@example.com"), None);

        assert!(!verify_session(&api, &store).await);
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn test_error_status_collapses_to_signed_out() {
        let api = FakeApi::default();
        *api.verify.lock().unwrap() = Reply::Status(401, Some("No token".to_string()));
        let store = SessionStore::new();
        store.login_success(admin("stale@example.com"), None);

        assert!(!verify_session(&api, &store).await);
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn test_malformed_payload_collapses_to_signed_out() {
        let api = FakeApi::default();
        *api.verify.lock().unwrap() = Reply::Malformed;
        let store = SessionStore::new();

        assert!(!verify_session(&api, &store).await);
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn test_success_without_admin_is_not_a_session() {
        let api = FakeApi::default();
        *api.verify.lock().unwrap() = Reply::Ok(VerifyResponse {
            success: true,
            admin: None,
            token: Some("t".to_string()),
        });
        let store = SessionStore::new();

        assert!(!verify_session(&api, &store).await);
        assert!(store.current().token().is_none());
    }
}
