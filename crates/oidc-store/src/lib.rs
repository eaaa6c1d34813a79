//! # OIDC Store - Reducer-Backed Session State
//!
//! A small centralized store for OpenID-Connect session state.
//!
//! ```text
//!   dispatch(action)
//!        │
//!        ▼
//!  ┌──────────────┐  states  ┌──────────────┐
//!  │   reducer    │ ───────▶ │  select(..)  │  reactive projections
//!  └──────────────┘          └──────────────┘
//!        │ broadcast
//!        ▼
//!  ┌──────────────┐
//!  │ subscribe(..)│  filtered action observers
//!  └──────────────┘
//! ```
//!
//! State changes are published before the action is broadcast, so an action
//! observer always sees the state that action produced. Every reduced state
//! is broadcast, so a selection sees each transition even if a later
//! dispatch lands before it is polled.

#![allow(clippy::missing_const_for_fn)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod actions;
pub mod model;
pub mod selectors;
pub mod state;
pub mod store;
pub mod subscriber;

// Re-export main types
pub use actions::{ActionFilter, ActionKind, OidcAction};
pub use model::{ExtraQueryParams, OidcUser, SilentRenewError};
pub use selectors::{
    get_oidc_identity, get_oidc_loading, is_identity_expired, is_identity_expiring,
    select_oidc_error_state, Selector,
};
pub use state::{reduce, ErrorState, OidcState};
pub use store::{InMemoryStore, StateStore};
pub use subscriber::{ActionSubscription, Selection, SubscriptionError};

/// Actions to buffer per subscriber before lagging.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_capacity() {
        assert_eq!(InMemoryStore::default().capacity(), DEFAULT_CHANNEL_CAPACITY);
    }
}
