//! Application state shared across handlers.

use std::sync::Arc;

use moka::future::Cache;
use uuid::Uuid;

use crate::api::{ApiError, HttpApi};
use crate::config::SiteConfig;
use crate::visitor::Visitor;

/// Most visitors kept in memory at once.
const MAX_VISITORS: u64 = 10_000;

/// The visitor type served by this binary.
pub type SiteVisitor = Visitor<HttpApi>;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. Each browser session maps to
/// one [`Visitor`]; visitors idle for longer than the configured timeout are
/// evicted, which drops their backend cookie jar and choreography.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SiteConfig,
    visitors: Cache<Uuid, Arc<SiteVisitor>>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: SiteConfig) -> Self {
        let visitors = Cache::builder()
            .max_capacity(MAX_VISITORS)
            .time_to_idle(config.visitor_idle)
            .build();

        Self {
            inner: Arc::new(AppStateInner { config, visitors }),
        }
    }

    /// Get a reference to the site configuration.
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.inner.config
    }

    /// Look up a visitor, creating a fresh one (with its own backend client)
    /// the first time an id is seen.
    ///
    /// Concurrent first requests for the same id share one initialization.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend client cannot be built.
    pub async fn visitor(&self, id: Uuid) -> Result<Arc<SiteVisitor>, Arc<ApiError>> {
        let config = &self.inner.config.api;
        self.inner
            .visitors
            .try_get_with(id, async move {
                let api = HttpApi::new(config)?;
                tracing::debug!(visitor_id = %id, "Visitor created");
                Ok::<_, ApiError>(Arc::new(Visitor::new(api)))
            })
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;

    fn state() -> AppState {
        let api = ApiConfig::new("http://127.0.0.1:9/api").unwrap();
        AppState::new(SiteConfig::local(api))
    }

    #[tokio::test]
    async fn test_concurrent_first_requests_share_one_visitor() {
        let state = state();
        let id = Uuid::new_v4();

        let (a, b) = tokio::join!(state.visitor(id), state.visitor(id));

        assert!(Arc::ptr_eq(&a.unwrap(), &b.unwrap()));
    }

    #[tokio::test]
    async fn test_distinct_ids_get_distinct_visitors() {
        let state = state();

        let a = state.visitor(Uuid::new_v4()).await.unwrap();
        let b = state.visitor(Uuid::new_v4()).await.unwrap();

        assert!(!Arc::ptr_eq(&a, &b));
    }
}
