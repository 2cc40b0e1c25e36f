//! Scroll-triggered entrance transitions for section cards.
//!
//! Every rendered card gets a one-shot transition that plays when the card
//! scrolls past the start threshold and never reverses or replays
//! ("play none none none"). While a transition is waiting to play it holds
//! a viewport observer in the [`ObserverRegistry`]; the observer is released
//! when the transition fires, when its card leaves the collection, or when
//! the section is torn down.
//!
//! The browser side (`static/js/reveal.js`) reads the `data-reveal-*`
//! attributes produced from [`Reveal`] and reports fired transitions back.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::{debug, trace};

/// Delay added per card position.
pub const STAGGER: Duration = Duration::from_millis(100);

/// Length of one entrance transition.
pub const TRANSITION_DURATION: Duration = Duration::from_millis(800);

/// Card top must reach 85% of the viewport height.
pub const START_THRESHOLD: &str = "top 85%";

/// Play forward on enter; do nothing on leave, re-enter or leave-back.
pub const TOGGLE_ACTIONS: &str = "play none none none";

/// Handle to one registered viewport observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Live viewport observers, shared by every choreographer of a visitor.
///
/// Cloning yields another handle to the same registry.
#[derive(Debug, Clone, Default)]
pub struct ObserverRegistry {
    inner: Arc<Mutex<RegistryInner>>,
}

#[derive(Debug, Default)]
struct RegistryInner {
    next_id: u64,
    live: HashMap<ObserverId, String>,
}

impl ObserverRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RegistryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn register(&self, label: String) -> ObserverId {
        let mut inner = self.lock();
        let id = ObserverId(inner.next_id);
        inner.next_id += 1;
        inner.live.insert(id, label);
        id
    }

    fn release(&self, id: ObserverId) -> bool {
        self.lock().live.remove(&id).is_some()
    }

    /// Number of observers still attached.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().live.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Labels (`section/key`) of the attached observers, sorted.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self.lock().live.values().cloned().collect();
        labels.sort();
        labels
    }
}

/// Render-time view of one card's transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reveal {
    pub key: String,
    pub delay_ms: u128,
    pub duration_ms: u128,
    pub start: &'static str,
    pub toggle_actions: &'static str,
    /// Already played; render the card in its final state.
    pub played: bool,
}

#[derive(Debug)]
struct Transition {
    key: String,
    delay: Duration,
    observer: Option<ObserverId>,
    played: bool,
}

/// Keeps one section's card transitions in step with its rendered collection.
#[derive(Debug)]
pub struct AnimationChoreographer {
    section: &'static str,
    registry: ObserverRegistry,
    transitions: Vec<Transition>,
}

impl AnimationChoreographer {
    #[must_use]
    pub const fn new(section: &'static str, registry: ObserverRegistry) -> Self {
        Self {
            section,
            registry,
            transitions: Vec::new(),
        }
    }

    #[must_use]
    pub const fn section(&self) -> &'static str {
        self.section
    }

    /// Re-run after the rendered collection changed (identity or length).
    ///
    /// Cards seen for the first time get a transition delayed by their
    /// position; cards already known keep theirs untouched (played or not);
    /// cards no longer rendered release their observer. Returns the keys
    /// that were newly attached.
    pub fn sync<'a, I>(&mut self, keys: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut previous: HashMap<String, Transition> = self
            .transitions
            .drain(..)
            .map(|t| (t.key.clone(), t))
            .collect();
        let mut attached = Vec::new();

        for (index, key) in keys.into_iter().enumerate() {
            if let Some(existing) = previous.remove(key) {
                self.transitions.push(existing);
                continue;
            }
            if self.transitions.iter().any(|t| t.key == key) {
                continue;
            }

            let observer = self.registry.register(format!("{}/{key}", self.section));
            let delay = STAGGER * u32::try_from(index).unwrap_or(u32::MAX);
            trace!(section = self.section, key, ?delay, "Attached transition");
            self.transitions.push(Transition {
                key: key.to_string(),
                delay,
                observer: Some(observer),
                played: false,
            });
            attached.push(key.to_string());
        }

        for (_, stale) in previous {
            if let Some(observer) = stale.observer {
                self.registry.release(observer);
            }
        }

        debug!(
            section = self.section,
            attached = attached.len(),
            total = self.transitions.len(),
            "Choreography synced"
        );
        attached
    }

    /// Play a card's transition. Returns `false` if it is unknown or has
    /// already played.
    pub fn fire(&mut self, key: &str) -> bool {
        let Some(transition) = self.transitions.iter_mut().find(|t| t.key == key) else {
            return false;
        };
        if transition.played {
            return false;
        }
        transition.played = true;
        if let Some(observer) = transition.observer.take() {
            self.registry.release(observer);
        }
        true
    }

    /// Release every observer and forget all transitions.
    pub fn teardown(&mut self) {
        for transition in self.transitions.drain(..) {
            if let Some(observer) = transition.observer {
                self.registry.release(observer);
            }
        }
    }

    #[must_use]
    pub fn reveal(&self, key: &str) -> Option<Reveal> {
        self.transitions.iter().find(|t| t.key == key).map(|t| Reveal {
            key: t.key.clone(),
            delay_ms: t.delay.as_millis(),
            duration_ms: TRANSITION_DURATION.as_millis(),
            start: START_THRESHOLD,
            toggle_actions: TOGGLE_ACTIONS,
            played: t.played,
        })
    }

    /// Number of transitions still waiting to play.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.transitions.iter().filter(|t| !t.played).count()
    }
}

impl Drop for AnimationChoreographer {
    fn drop(&mut self) {
        self.teardown();
    }
}
