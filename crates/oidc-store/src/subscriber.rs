//! # Store Subscriptions
//!
//! Observing the store: filtered action subscriptions and reactive
//! state selections.

use crate::actions::{ActionFilter, OidcAction};
use crate::selectors::Selector;
use crate::state::OidcState;
use std::pin::Pin;
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::sync::{broadcast, watch};
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::Stream;
use tracing::debug;

/// Errors from subscription operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The store was dropped.
    #[error("Store closed")]
    Closed,
}

/// A subscription handle for receiving dispatched actions.
pub struct ActionSubscription {
    receiver: broadcast::Receiver<OidcAction>,
    filter: ActionFilter,
}

impl ActionSubscription {
    pub(crate) fn new(receiver: broadcast::Receiver<OidcAction>, filter: ActionFilter) -> Self {
        Self { receiver, filter }
    }

    /// Receive the next action that matches the filter.
    ///
    /// Returns `None` once the store has been dropped.
    pub async fn recv(&mut self) -> Option<OidcAction> {
        loop {
            let action = match self.receiver.recv().await {
                Ok(a) => a,
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    debug!(lagged = count, "Action subscriber lagged, some actions dropped");
                    continue;
                }
            };

            if self.filter.matches(&action) {
                return Some(action);
            }
        }
    }

    /// Try to receive the next matching action without waiting.
    ///
    /// - `Ok(Some(action))` - a matching action was queued
    /// - `Ok(None)` - nothing queued
    /// - `Err(SubscriptionError::Closed)` - the store was dropped
    pub fn try_recv(&mut self) -> Result<Option<OidcAction>, SubscriptionError> {
        loop {
            let action = match self.receiver.try_recv() {
                Ok(a) => a,
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Closed) => {
                    return Err(SubscriptionError::Closed)
                }
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            };

            if self.filter.matches(&action) {
                return Ok(Some(action));
            }
        }
    }

    /// Drain every queued matching action.
    pub fn drain(&mut self) -> Vec<OidcAction> {
        let mut out = Vec::new();
        while let Ok(Some(action)) = self.try_recv() {
            out.push(action);
        }
        out
    }

    /// Get the filter for this subscription.
    #[must_use]
    pub fn filter(&self) -> &ActionFilter {
        &self.filter
    }
}

/// A reactive projection of the store state.
///
/// Yields the projected value of the state at creation first, then every
/// distinct change in dispatch order. Ends when the store is dropped.
///
/// If the selection falls more than the channel capacity behind, the
/// skipped states are lost and it resumes from the latest state.
pub struct Selection<T> {
    states: BroadcastStream<OidcState>,
    receiver: watch::Receiver<OidcState>,
    selector: Selector<T>,
    initial: Option<T>,
    last: Option<T>,
}

impl<T> Selection<T>
where
    T: Clone + PartialEq,
{
    /// Create a selection from the latest-state receiver and a subscription
    /// to reduced states taken no later than `receiver` was read.
    #[must_use]
    pub fn new(
        receiver: watch::Receiver<OidcState>,
        states: broadcast::Receiver<OidcState>,
        selector: Selector<T>,
    ) -> Self {
        let initial = selector(&receiver.borrow());
        Self {
            states: BroadcastStream::new(states),
            receiver,
            selector,
            initial: Some(initial),
            last: None,
        }
    }

    /// The projected value of the latest state, without consuming the stream.
    #[must_use]
    pub fn current(&self) -> T {
        (self.selector)(&self.receiver.borrow())
    }
}

impl<T> Stream for Selection<T>
where
    T: Clone + PartialEq + Unpin,
{
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if let Some(value) = this.initial.take() {
            this.last = Some(value.clone());
            return Poll::Ready(Some(value));
        }
        loop {
            let value = match Pin::new(&mut this.states).poll_next(cx) {
                Poll::Ready(Some(Ok(state))) => (this.selector)(&state),
                Poll::Ready(Some(Err(BroadcastStreamRecvError::Lagged(count)))) => {
                    debug!(lagged = count, "Selection lagged, resuming from latest state");
                    (this.selector)(&this.receiver.borrow())
                }
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            };
            if this.last.as_ref() == Some(&value) {
                continue;
            }
            this.last = Some(value.clone());
            return Poll::Ready(Some(value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ActionKind;
    use crate::selectors::{get_oidc_identity, get_oidc_loading};
    use crate::store::{InMemoryStore, StateStore};
    use std::time::Duration;
    use tokio::time::timeout;
    use tokio_stream::StreamExt;

    #[tokio::test]
    async fn test_subscription_recv() {
        let store = InMemoryStore::new();
        let mut sub = store.subscribe(ActionFilter::all());

        store.dispatch(OidcAction::SigninSilent);

        let received = timeout(Duration::from_millis(100), sub.recv())
            .await
            .expect("timeout")
            .expect("action");
        assert_eq!(received, OidcAction::SigninSilent);
    }

    #[tokio::test]
    async fn test_subscription_filter() {
        let store = InMemoryStore::new();
        let mut sub = store.subscribe(ActionFilter::kinds(vec![ActionKind::OnUserUnloaded]));

        store.dispatch(OidcAction::GetOidcUser);
        store.dispatch(OidcAction::OnUserUnloaded);

        let received = timeout(Duration::from_millis(100), sub.recv())
            .await
            .expect("timeout")
            .expect("action");
        assert_eq!(received, OidcAction::OnUserUnloaded);
        assert!(matches!(sub.try_recv(), Ok(None)));
    }

    #[test]
    fn test_try_recv_empty() {
        let store = InMemoryStore::new();
        let mut sub = store.subscribe(ActionFilter::all());
        assert!(matches!(sub.try_recv(), Ok(None)));
    }

    #[test]
    fn test_try_recv_closed() {
        let store = InMemoryStore::new();
        let mut sub = store.subscribe(ActionFilter::all());
        drop(store);
        assert_eq!(sub.try_recv(), Err(SubscriptionError::Closed));
    }

    #[test]
    fn test_drain_preserves_order() {
        let store = InMemoryStore::new();
        let mut sub = store.subscribe(ActionFilter::all());
        store.dispatch(OidcAction::GetOidcUser);
        store.dispatch(OidcAction::UserDoneLoading);

        assert_eq!(
            sub.drain(),
            vec![OidcAction::GetOidcUser, OidcAction::UserDoneLoading]
        );
    }

    #[tokio::test]
    async fn test_selection_emits_current_then_changes() {
        let store = InMemoryStore::new();
        let mut loading = store.select(get_oidc_loading);

        let first = timeout(Duration::from_millis(100), loading.next())
            .await
            .expect("timeout");
        assert_eq!(first, Some(true));

        store.dispatch(OidcAction::UserDoneLoading);
        let second = timeout(Duration::from_millis(100), loading.next())
            .await
            .expect("timeout");
        assert_eq!(second, Some(false));
    }

    #[tokio::test]
    async fn test_selection_skips_unchanged_projection() {
        let store = InMemoryStore::new();
        let mut identity = store.select(get_oidc_identity);
        assert_eq!(identity.next().await, Some(None));

        // Changes loading but not identity
        store.dispatch(OidcAction::UserDoneLoading);
        let pending = timeout(Duration::from_millis(50), identity.next()).await;
        assert!(pending.is_err());
    }

    #[test]
    fn test_selection_current() {
        let store = InMemoryStore::new();
        let loading = store.select(get_oidc_loading);
        assert!(loading.current());
        store.dispatch(OidcAction::UserDoneLoading);
        assert!(!loading.current());
    }

    #[tokio::test]
    async fn test_selection_keeps_transitions_dispatched_before_poll() {
        let store = InMemoryStore::new();
        let mut loading = store.select(get_oidc_loading);

        // Both dispatches land before the selection is polled
        store.dispatch(OidcAction::UserDoneLoading);
        store.dispatch(OidcAction::GetOidcUser);

        let mut seen = Vec::new();
        for _ in 0..3 {
            let value = timeout(Duration::from_millis(100), loading.next())
                .await
                .expect("timeout");
            seen.push(value);
        }
        assert_eq!(seen, vec![Some(true), Some(false), Some(true)]);
    }

    #[tokio::test]
    async fn test_selection_resumes_after_lag() {
        let store = InMemoryStore::with_capacity(2);
        let mut loading = store.select(get_oidc_loading);
        assert_eq!(loading.next().await, Some(true));

        for _ in 0..4 {
            store.dispatch(OidcAction::UserDoneLoading);
            store.dispatch(OidcAction::GetOidcUser);
        }
        store.dispatch(OidcAction::UserDoneLoading);

        let mut last = None;
        while let Ok(Some(value)) = timeout(Duration::from_millis(50), loading.next()).await {
            last = Some(value);
        }
        assert_eq!(last, Some(false));
    }

    #[tokio::test]
    async fn test_selection_ends_when_store_dropped() {
        let store = InMemoryStore::new();
        let mut loading = store.select(get_oidc_loading);
        drop(store);

        assert_eq!(loading.next().await, Some(true));
        assert_eq!(loading.next().await, None);
    }
}
