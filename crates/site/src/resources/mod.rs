//! Content sections backed by a remote collection.
//!
//! A [`ListResource`] fetches its section's collection once per mount and
//! then only grows by appending what the backend echoes after a successful
//! creation. It never refetches after a create, so if the backend applies
//! its own ordering or filtering the page is only fully consistent again
//! after the next reload.
//!
//! ```text
//! Loading --fetch ok--> Loaded <--> Mutating
//!    \
//!     `--fetch err--> LoadFailed
//! ```

mod certification;
mod project;

use std::future::Future;
use std::marker::PhantomData;

use portfolio_core::ContentItem;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::api::{ApiError, PortfolioApi};

pub use certification::{CertificationDraft, Certifications};
pub use project::{ProjectDraft, Projects};

/// Client-side validation failure; no request was sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    /// One or more required fields are empty.
    #[error("{0}")]
    Incomplete(String),
    /// A field is present but unusable.
    #[error("{0}")]
    Invalid(String),
}

/// Why a creation did not append anything.
#[derive(Debug, Error)]
pub enum CreateError {
    #[error(transparent)]
    Draft(#[from] DraftError),

    /// The section has not finished loading, failed to load, or is busy
    /// with another creation.
    #[error("section is not ready for new items")]
    NotReady,

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl CreateError {
    /// Alert text shown inside the still-open modal.
    #[must_use]
    pub fn user_message(&self, kind: &str) -> String {
        match self {
            Self::Draft(e) => e.to_string(),
            Self::NotReady => format!("Cannot add a {kind} right now. Reload the page and try again."),
            Self::Api(ApiError::Api { status, message }) => format!(
                "Failed to add {kind}: {}",
                message
                    .clone()
                    .unwrap_or_else(|| format!("request rejected ({status})"))
            ),
            Self::Api(ApiError::Http(_)) => {
                format!("Error adding {kind}: could not reach the server")
            }
            Self::Api(ApiError::Parse(_)) => {
                format!("Error adding {kind}: unexpected response from the server")
            }
        }
    }
}

/// One content section: its record type, its form draft and its endpoints.
pub trait Section: Send + Sync + 'static {
    type Item: ContentItem + Clone + std::fmt::Debug + Send + Sync + 'static;
    type Draft: Send + Sync;
    type Payload: Send;

    /// Anchor id and URL segment, e.g. `projects`.
    const NAME: &'static str;

    /// Text for a loaded section with no items.
    const EMPTY_MESSAGE: &'static str;

    /// Check required fields and build the request payload.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError`] when the draft cannot be submitted.
    fn validate(draft: &Self::Draft) -> Result<Self::Payload, DraftError>;

    fn fetch<A: PortfolioApi>(
        api: &A,
    ) -> impl Future<Output = Result<Vec<Self::Item>, ApiError>> + Send;

    fn create<A: PortfolioApi>(
        api: &A,
        payload: Self::Payload,
    ) -> impl Future<Output = Result<Self::Item, ApiError>> + Send;
}

/// Lifecycle of a section's collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListPhase {
    Loading,
    Loaded,
    /// A creation request is in flight.
    Mutating,
    LoadFailed,
}

/// A section's collection and where it is in its lifecycle.
#[derive(Debug, Clone)]
pub struct ListResource<S: Section> {
    phase: ListPhase,
    items: Vec<S::Item>,
    _section: PhantomData<S>,
}

impl<S: Section> Default for ListResource<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Section> ListResource<S> {
    /// A freshly mounted section, not yet fetched.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: ListPhase::Loading,
            items: Vec::new(),
            _section: PhantomData,
        }
    }

    #[must_use]
    pub const fn phase(&self) -> ListPhase {
        self.phase
    }

    #[must_use]
    pub fn items(&self) -> &[S::Item] {
        &self.items
    }

    /// Loaded successfully with zero items; rendered as "no items", not an error.
    #[must_use]
    pub fn is_empty_loaded(&self) -> bool {
        self.phase == ListPhase::Loaded && self.items.is_empty()
    }

    /// Whether the "Add" control may be offered (and a creation accepted).
    #[must_use]
    pub fn accepts_creation(&self) -> bool {
        self.phase == ListPhase::Loaded
    }

    /// Fetch the collection and replace the current one wholesale.
    pub async fn load<A: PortfolioApi>(&mut self, api: &A) {
        self.begin_load();
        let result = S::fetch(api).await;
        self.finish_load(result);
    }

    /// Reset to `Loading` with no items.
    pub fn begin_load(&mut self) {
        self.phase = ListPhase::Loading;
        self.items.clear();
    }

    /// Apply a fetch result. Failures are logged only.
    pub fn finish_load(&mut self, result: Result<Vec<S::Item>, ApiError>) {
        match result {
            Ok(items) => {
                debug!(section = S::NAME, count = items.len(), "Section loaded");
                self.items = items;
                self.phase = ListPhase::Loaded;
            }
            Err(e) => {
                error!(section = S::NAME, error = %e, "Failed to fetch section");
                self.items.clear();
                self.phase = ListPhase::LoadFailed;
            }
        }
    }

    /// Validate a draft and create the item, appending the backend's echo.
    ///
    /// Returns the index of the appended item.
    ///
    /// # Errors
    ///
    /// See [`CreateError`]; on error the collection is unchanged.
    pub async fn create<A: PortfolioApi>(
        &mut self,
        api: &A,
        draft: &S::Draft,
    ) -> Result<usize, CreateError> {
        let payload = self.begin_create(draft)?;
        let result = S::create(api, payload).await;
        self.finish_create(result)
    }

    /// Validate `draft` and enter `Mutating`.
    ///
    /// # Errors
    ///
    /// [`CreateError::NotReady`] unless `Loaded`; [`CreateError::Draft`] if
    /// validation fails (phase unchanged, no request should be sent).
    pub fn begin_create(&mut self, draft: &S::Draft) -> Result<S::Payload, CreateError> {
        if !self.accepts_creation() {
            return Err(CreateError::NotReady);
        }
        let payload = S::validate(draft)?;
        self.phase = ListPhase::Mutating;
        Ok(payload)
    }

    /// Apply a creation result and return to `Loaded`.
    ///
    /// # Errors
    ///
    /// Passes the API error through; [`CreateError::NotReady`] if the
    /// section was remounted while the request was in flight.
    pub fn finish_create(
        &mut self,
        result: Result<S::Item, ApiError>,
    ) -> Result<usize, CreateError> {
        if self.phase != ListPhase::Mutating {
            warn!(section = S::NAME, phase = ?self.phase, "Creation finished after remount; dropping echo");
            return match result {
                Ok(_) => Err(CreateError::NotReady),
                Err(e) => Err(e.into()),
            };
        }

        self.phase = ListPhase::Loaded;
        let item = result?;
        Ok(self.append(item))
    }

    /// Give up on an in-flight creation whose result will never arrive.
    ///
    /// Returns to `Loaded` with the collection unchanged; a no-op in any
    /// other phase.
    pub fn abort_create(&mut self) {
        if self.phase == ListPhase::Mutating {
            warn!(section = S::NAME, "Creation abandoned before the backend answered");
            self.phase = ListPhase::Loaded;
        }
    }

    /// Append an item at the end, keeping keys unique.
    fn append(&mut self, item: S::Item) -> usize {
        if let Some(existing) = self.items.iter().position(|i| i.key() == item.key()) {
            warn!(section = S::NAME, key = item.key(), "Backend echoed an existing item; not duplicating");
            return existing;
        }
        self.items.push(item);
        self.items.len() - 1
    }
}
