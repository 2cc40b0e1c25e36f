//! Per-visitor application state.
//!
//! A [`Visitor`] is everything one browser's copy of the single-page app
//! holds: its own backend client (and cookie jar), its admin session, the
//! login form, both content sections and their card choreography. A full
//! page load is a mount: the session is re-verified, both sections are
//! fetched again and their choreography starts over.

use std::sync::{Mutex, MutexGuard, PoisonError};

use portfolio_core::{Certification, ContentItem, Project};
use secrecy::SecretString;
use tracing::{debug, instrument};

use crate::animation::{AnimationChoreographer, ObserverRegistry, Reveal};
use crate::api::{ApiError, PortfolioApi};
use crate::contact::{ContactDraft, ContactOutcome, submit_contact};
use crate::nav::Nav;
use crate::resources::{
    CertificationDraft, Certifications, CreateError, ListPhase, ListResource, ProjectDraft,
    Projects, Section,
};
use crate::session::{CredentialSubmitter, LoginOutcome, SessionStore, sign_out, verify_session};

/// A card ready to render: the record plus its entrance transition.
#[derive(Debug, Clone)]
pub struct Card<T> {
    pub item: T,
    pub reveal: Option<Reveal>,
}

/// Render-time copy of one section.
#[derive(Debug, Clone)]
pub struct SectionSnapshot<T> {
    pub phase: ListPhase,
    pub cards: Vec<Card<T>>,
}

impl<T> SectionSnapshot<T> {
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.phase == ListPhase::Loading
    }

    #[must_use]
    pub fn is_empty_loaded(&self) -> bool {
        matches!(self.phase, ListPhase::Loaded | ListPhase::Mutating) && self.cards.is_empty()
    }

    #[must_use]
    pub fn is_load_failed(&self) -> bool {
        self.phase == ListPhase::LoadFailed
    }
}

/// A card appended by a successful creation.
#[derive(Debug, Clone)]
pub struct Appended<T> {
    pub card: Card<T>,
    /// The section was showing its empty placeholder before this card.
    pub was_first: bool,
}

/// One section's collection and the transitions of its rendered cards.
#[derive(Debug)]
struct SectionView<S: Section> {
    list: ListResource<S>,
    choreographer: AnimationChoreographer,
    /// Bumped on every mount so a slow fetch from an earlier mount cannot
    /// overwrite a newer one.
    generation: u64,
}

impl<S: Section> SectionView<S> {
    fn new(observers: ObserverRegistry) -> Self {
        Self {
            list: ListResource::new(),
            choreographer: AnimationChoreographer::new(S::NAME, observers),
            generation: 0,
        }
    }

    fn begin_mount(&mut self) -> u64 {
        self.choreographer.teardown();
        self.list.begin_load();
        self.generation += 1;
        self.generation
    }

    fn finish_mount(&mut self, generation: u64, result: Result<Vec<S::Item>, ApiError>) {
        if generation != self.generation {
            debug!(section = S::NAME, "Discarding fetch from a superseded mount");
            return;
        }
        self.list.finish_load(result);
        self.sync();
    }

    fn sync(&mut self) {
        let items = self.list.items();
        self.choreographer.sync(items.iter().map(ContentItem::key));
    }

    fn card(&self, item: &S::Item) -> Card<S::Item> {
        Card {
            item: item.clone(),
            reveal: self.choreographer.reveal(item.key()),
        }
    }

    fn snapshot(&self) -> SectionSnapshot<S::Item> {
        SectionSnapshot {
            phase: self.list.phase(),
            cards: self.list.items().iter().map(|i| self.card(i)).collect(),
        }
    }
}

/// Section views are only locked between awaits, never across one.
fn lock<S: Section>(view: &Mutex<SectionView<S>>) -> MutexGuard<'_, SectionView<S>> {
    view.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Marks a section `Mutating` for one creation request.
///
/// Dropped before [`disarm`](Self::disarm) (the request was cancelled), it
/// returns the section to `Loaded` so later creations are not refused.
struct PendingCreate<'a, S: Section> {
    view: &'a Mutex<SectionView<S>>,
    armed: bool,
}

impl<S: Section> PendingCreate<'_, S> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl<S: Section> Drop for PendingCreate<'_, S> {
    fn drop(&mut self) {
        if self.armed {
            lock(self.view).list.abort_create();
        }
    }
}

/// What the home page renders from.
#[derive(Debug, Clone)]
pub struct HomeSnapshot {
    pub nav: Nav,
    pub is_admin: bool,
    pub projects: SectionSnapshot<Project>,
    pub certifications: SectionSnapshot<Certification>,
}

/// All state belonging to one visitor.
#[derive(Debug)]
pub struct Visitor<A: PortfolioApi> {
    api: A,
    session: SessionStore,
    login: CredentialSubmitter,
    observers: ObserverRegistry,
    projects: Mutex<SectionView<Projects>>,
    certifications: Mutex<SectionView<Certifications>>,
}

impl<A: PortfolioApi> Visitor<A> {
    #[must_use]
    pub fn new(api: A) -> Self {
        let observers = ObserverRegistry::new();
        Self {
            api,
            session: SessionStore::new(),
            login: CredentialSubmitter::new(),
            projects: Mutex::new(SectionView::new(observers.clone())),
            certifications: Mutex::new(SectionView::new(observers.clone())),
            observers,
        }
    }

    #[must_use]
    pub const fn api(&self) -> &A {
        &self.api
    }

    #[must_use]
    pub const fn session(&self) -> &SessionStore {
        &self.session
    }

    #[must_use]
    pub const fn login_form(&self) -> &CredentialSubmitter {
        &self.login
    }

    /// Viewport observers currently attached across both sections.
    #[must_use]
    pub const fn observers(&self) -> &ObserverRegistry {
        &self.observers
    }

    #[must_use]
    pub fn nav(&self) -> Nav {
        Nav::for_session(&self.session.current())
    }

    /// App load without the home sections (login page).
    pub async fn verify(&self) -> bool {
        verify_session(&self.api, &self.session).await
    }

    /// Full home page load.
    ///
    /// Tears down the previous choreography, then verifies the session and
    /// fetches both sections concurrently. Each section is rendered as soon
    /// as its own fetch settles; one failing does not affect the other.
    #[instrument(skip(self))]
    pub async fn mount(&self) -> HomeSnapshot {
        let project_generation = lock(&self.projects).begin_mount();
        let certification_generation = lock(&self.certifications).begin_mount();

        let (_, projects, certifications) = tokio::join!(
            verify_session(&self.api, &self.session),
            Projects::fetch(&self.api),
            Certifications::fetch(&self.api),
        );

        lock(&self.projects).finish_mount(project_generation, projects);
        lock(&self.certifications).finish_mount(certification_generation, certifications);

        self.snapshot()
    }

    /// Current state, without touching the network.
    pub fn snapshot(&self) -> HomeSnapshot {
        let nav = self.nav();
        HomeSnapshot {
            is_admin: nav.is_admin(),
            nav,
            projects: lock(&self.projects).snapshot(),
            certifications: lock(&self.certifications).snapshot(),
        }
    }

    /// Submit the admin login form.
    pub async fn submit_login(&self, email: &str, password: SecretString) -> LoginOutcome {
        self.login
            .submit(&self.api, &self.session, email, password)
            .await
    }

    pub async fn logout(&self) {
        sign_out(&self.api, &self.session).await;
    }

    /// Create a project and append the backend's echo.
    ///
    /// # Errors
    ///
    /// See [`CreateError`]; the collection is unchanged on error.
    pub async fn create_project(
        &self,
        draft: &ProjectDraft,
    ) -> Result<Appended<Project>, CreateError> {
        self.create(&self.projects, draft).await
    }

    /// Upload a certification and append the backend's echo.
    ///
    /// # Errors
    ///
    /// See [`CreateError`]; the collection is unchanged on error.
    pub async fn create_certification(
        &self,
        draft: &CertificationDraft,
    ) -> Result<Appended<Certification>, CreateError> {
        self.create(&self.certifications, draft).await
    }

    async fn create<S: Section>(
        &self,
        view: &Mutex<SectionView<S>>,
        draft: &S::Draft,
    ) -> Result<Appended<S::Item>, CreateError> {
        // The lock is not held across the request; `Mutating` refuses a
        // second creation meanwhile.
        let payload = lock(view).list.begin_create(draft)?;
        let pending = PendingCreate { view, armed: true };
        let result = S::create(&self.api, payload).await;
        pending.disarm();

        let mut view = lock(view);
        let len_before = view.list.items().len();
        let index = view.list.finish_create(result)?;
        view.sync();

        let item = view
            .list
            .items()
            .get(index)
            .ok_or(CreateError::NotReady)?;
        Ok(Appended {
            card: view.card(item),
            was_first: len_before == 0 && view.list.items().len() == 1,
        })
    }

    /// Record that a card's transition played in the browser.
    ///
    /// Returns `false` for unknown sections or keys and for transitions
    /// that already played.
    pub fn transition_played(&self, section: &str, key: &str) -> bool {
        if section == Projects::NAME {
            lock(&self.projects).choreographer.fire(key)
        } else if section == Certifications::NAME {
            lock(&self.certifications).choreographer.fire(key)
        } else {
            false
        }
    }

    /// Send the contact form.
    pub async fn send_contact(&self, draft: &ContactDraft) -> ContactOutcome {
        submit_contact(&self.api, draft).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    use super::*;
    use crate::api::fake::{FakeApi, Reply, certification, project};

    fn draft(title: &str) -> ProjectDraft {
        ProjectDraft {
            title: title.to_string(),
            github: "https://github.com/example/x".to_string(),
            tech: "Go, Rust".to_string(),
            ..ProjectDraft::default()
        }
    }

    fn titles(snapshot: &SectionSnapshot<Project>) -> Vec<&str> {
        snapshot.cards.iter().map(|c| c.item.title.as_str()).collect()
    }

    #[tokio::test]
    async fn test_mount_loads_both_sections_and_verifies() {
        let api = FakeApi::signed_in("owner@example.com");
        *api.projects.lock().unwrap() = Reply::Ok(vec![project("p1", "One"), project("p2", "Two")]);
        *api.certifications.lock().unwrap() = Reply::Ok(vec![certification("c1", "Cert")]);
        let visitor = Visitor::new(api);

        let home = visitor.mount().await;

        assert!(home.is_admin);
        assert_eq!(titles(&home.projects), vec!["One", "Two"]);
        assert_eq!(home.certifications.cards.len(), 1);
        assert_eq!(home.projects.cards[1].reveal.as_ref().unwrap().delay_ms, 100);
        assert_eq!(visitor.observers().len(), 3);
    }

    #[tokio::test]
    async fn test_one_section_failing_leaves_the_other() {
        let api = FakeApi::default();
        *api.projects.lock().unwrap() = Reply::Status(500, None);
        *api.certifications.lock().unwrap() = Reply::Ok(vec![certification("c1", "Cert")]);
        let visitor = Visitor::new(api);

        let home = visitor.mount().await;

        assert!(home.projects.is_load_failed());
        assert!(!home.projects.is_empty_loaded());
        assert_eq!(home.certifications.cards.len(), 1);
        assert!(!home.is_admin);
    }

    #[tokio::test]
    async fn test_create_appends_card_with_transition() {
        let api = FakeApi::signed_in("owner@example.com");
        *api.projects.lock().unwrap() = Reply::Ok(vec![project("p1", "One"), project("p2", "Two")]);
        let visitor = Visitor::new(api);
        visitor.mount().await;

        let appended = visitor.create_project(&draft("X")).await.unwrap();

        assert_eq!(appended.card.item.title, "X");
        assert!(!appended.was_first);
        assert_eq!(appended.card.reveal.unwrap().delay_ms, 200);
        let home = visitor.snapshot();
        assert_eq!(titles(&home.projects), vec!["One", "Two", "X"]);
        assert_eq!(visitor.api().project_fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cancelled_create_leaves_section_usable() {
        let visitor = Visitor::new(FakeApi::signed_in("owner@example.com"));
        visitor.mount().await;
        visitor.api().hang.store(true, Ordering::SeqCst);

        let abandoned =
            tokio::time::timeout(Duration::from_millis(20), visitor.create_project(&draft("X")))
                .await;
        assert!(abandoned.is_err());
        assert_eq!(visitor.snapshot().projects.phase, ListPhase::Loaded);

        visitor.api().hang.store(false, Ordering::SeqCst);
        let appended = visitor.create_project(&draft("Y")).await.unwrap();

        assert_eq!(appended.card.item.title, "Y");
        assert_eq!(titles(&visitor.snapshot().projects), vec!["Y"]);
    }

    #[tokio::test]
    async fn test_first_item_replaces_placeholder() {
        let visitor = Visitor::new(FakeApi::signed_in("owner@example.com"));
        let home = visitor.mount().await;
        assert!(home.projects.is_empty_loaded());

        let appended = visitor.create_project(&draft("X")).await.unwrap();

        assert!(appended.was_first);
    }

    #[tokio::test]
    async fn test_remount_tears_down_and_replays() {
        let api = FakeApi::default();
        *api.projects.lock().unwrap() = Reply::Ok(vec![project("p1", "One")]);
        let visitor = Visitor::new(api);
        visitor.mount().await;
        assert!(visitor.transition_played("projects", "p1"));
        assert!(!visitor.transition_played("projects", "p1"));
        assert!(visitor.observers().is_empty());

        let home = visitor.mount().await;

        assert!(!home.projects.cards[0].reveal.as_ref().unwrap().played);
        assert_eq!(visitor.observers().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_section_is_ignored() {
        let visitor = Visitor::new(FakeApi::default());
        visitor.mount().await;
        assert!(!visitor.transition_played("blog", "p1"));
    }

    #[tokio::test]
    async fn test_login_then_logout() {
        let api = FakeApi::default();
        api.accept_login(true);
        let visitor = Visitor::new(api);

        let outcome = visitor
            .submit_login("owner@example.com", SecretString::from("pw"))
            .await;
        assert_eq!(outcome, LoginOutcome::Authenticated);
        assert!(visitor.nav().is_admin());

        visitor.logout().await;
        assert!(!visitor.nav().is_admin());
    }
}
