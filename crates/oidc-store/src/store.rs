//! # State Store
//!
//! The dispatch/select contract and its in-memory implementation.

use crate::actions::{ActionFilter, OidcAction};
use crate::selectors::Selector;
use crate::state::{reduce, OidcState};
use crate::subscriber::{ActionSubscription, Selection};
use crate::DEFAULT_CHANNEL_CAPACITY;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{broadcast, watch};
use tracing::{debug, trace};

/// Dispatch/select contract of a centralized state store.
pub trait StateStore: Send + Sync {
    /// Dispatch an action to the reducer.
    fn dispatch(&self, action: OidcAction);

    /// A receiver observing the latest state.
    fn watch_state(&self) -> watch::Receiver<OidcState>;

    /// A receiver for every state the reducer produces, in dispatch order.
    fn subscribe_states(&self) -> broadcast::Receiver<OidcState>;

    /// Select a projection of the state as a reactive stream.
    fn select<T>(&self, selector: Selector<T>) -> Selection<T>
    where
        Self: Sized,
        T: Clone + PartialEq,
    {
        // Subscribe before reading the current state so no change falls between
        let states = self.subscribe_states();
        Selection::new(self.watch_state(), states, selector)
    }
}

/// In-memory, reducer-backed store.
///
/// Dispatch is serialized: the reducer runs, the new state is published on
/// the `watch` channel and the state broadcast, and then the action is
/// broadcast, all before the next dispatch starts. Action and state
/// subscribers therefore see the same order.
pub struct InMemoryStore {
    /// Latest state.
    state: watch::Sender<OidcState>,

    /// Broadcast sender for reduced states.
    states: broadcast::Sender<OidcState>,

    /// Broadcast sender for dispatched actions.
    actions: broadcast::Sender<OidcAction>,

    /// Held for the whole of a dispatch.
    dispatch_lock: Mutex<()>,

    /// Total actions dispatched.
    actions_dispatched: AtomicU64,

    /// Action channel capacity.
    capacity: usize,
}

impl InMemoryStore {
    /// Create a store with the initial state and default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a store with the initial state and the given action capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_state(OidcState::default(), capacity)
    }

    /// Create a store seeded with `state`.
    #[must_use]
    pub fn with_state(state: OidcState, capacity: usize) -> Self {
        let (state, _) = watch::channel(state);
        let (states, _) = broadcast::channel(capacity.max(1));
        let (actions, _) = broadcast::channel(capacity.max(1));
        Self {
            state,
            states,
            actions,
            dispatch_lock: Mutex::new(()),
            actions_dispatched: AtomicU64::new(0),
            capacity,
        }
    }

    /// Subscribe to dispatched actions matching a filter.
    #[must_use]
    pub fn subscribe(&self, filter: ActionFilter) -> ActionSubscription {
        debug!(kinds = ?filter.kinds, "New action subscription created");
        ActionSubscription::new(self.actions.subscribe(), filter)
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn snapshot(&self) -> OidcState {
        self.state.borrow().clone()
    }

    /// Get the number of live action subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.actions.receiver_count()
    }

    /// Get the total number of actions dispatched.
    #[must_use]
    pub fn actions_dispatched(&self) -> u64 {
        self.actions_dispatched.load(Ordering::Relaxed)
    }

    /// Get the action channel capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore for InMemoryStore {
    fn dispatch(&self, action: OidcAction) {
        let _guard = self.dispatch_lock.lock();
        self.actions_dispatched.fetch_add(1, Ordering::Relaxed);

        let mut reduced = None;
        let changed = self.state.send_if_modified(|state| {
            let next = reduce(state, &action);
            if next == *state {
                return false;
            }
            *state = next;
            reduced = Some(state.clone());
            true
        });
        if let Some(state) = reduced {
            // No selections is fine
            let _ = self.states.send(state);
        }

        let kind = action.kind();
        match self.actions.send(action) {
            Ok(receivers) => {
                debug!(
                    action = kind.type_name(),
                    state_changed = changed,
                    receivers,
                    "Action dispatched"
                );
            }
            Err(_) => {
                // No action subscribers; the reducer still ran
                trace!(action = kind.type_name(), state_changed = changed, "Action dispatched");
            }
        }
    }

    fn watch_state(&self) -> watch::Receiver<OidcState> {
        self.state.subscribe()
    }

    fn subscribe_states(&self) -> broadcast::Receiver<OidcState> {
        self.states.subscribe()
    }
}
