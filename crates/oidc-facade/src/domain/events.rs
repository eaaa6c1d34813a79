//! # Client Events
//!
//! Event kinds the OIDC client raises, what they carry, and the callback
//! registry keyed by kind.

use oidc_store::{OidcUser, SilentRenewError};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Lifecycle events raised by the OIDC client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OidcEvent {
    /// The access token has expired.
    AccessTokenExpired,
    /// The access token is about to expire.
    AccessTokenExpiring,
    /// Background token refresh failed.
    SilentRenewError,
    /// A user session was established or refreshed.
    UserLoaded,
    /// The user session was removed.
    UserUnloaded,
    /// The user signed out at the authorization server.
    UserSignedOut,
    /// The session at the authorization server changed.
    UserSessionChanged,
}

impl OidcEvent {
    /// Every event kind, in default registration order.
    pub const ALL: [OidcEvent; 7] = [
        OidcEvent::AccessTokenExpired,
        OidcEvent::AccessTokenExpiring,
        OidcEvent::SilentRenewError,
        OidcEvent::UserLoaded,
        OidcEvent::UserUnloaded,
        OidcEvent::UserSignedOut,
        OidcEvent::UserSessionChanged,
    ];

    /// Name used in logs and metric labels.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::AccessTokenExpired => "AccessTokenExpired",
            Self::AccessTokenExpiring => "AccessTokenExpiring",
            Self::SilentRenewError => "SilentRenewError",
            Self::UserLoaded => "UserLoaded",
            Self::UserUnloaded => "UserUnloaded",
            Self::UserSignedOut => "UserSignedOut",
            Self::UserSessionChanged => "UserSessionChanged",
        }
    }
}

impl std::fmt::Display for OidcEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Data passed to event callbacks.
#[derive(Debug, Clone, PartialEq)]
pub enum EventPayload {
    /// The event carries nothing.
    None,
    /// `UserLoaded`: the loaded user.
    User(OidcUser),
    /// `SilentRenewError`: the refresh failure.
    Error(SilentRenewError),
}

/// Callback invoked when an event fires.
pub type EventCallback = Arc<dyn Fn(&EventPayload) + Send + Sync>;

/// Callbacks registered per event kind.
///
/// No deduplication and no removal; callbacks for one kind run in
/// registration order.
#[derive(Default)]
pub struct EventRegistry {
    callbacks: RwLock<HashMap<OidcEvent, Vec<EventCallback>>>,
}

impl EventRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a callback for `event`.
    pub fn register(&self, event: OidcEvent, callback: EventCallback) {
        self.callbacks.write().entry(event).or_default().push(callback);
    }

    /// Invoke every callback for `event`; returns how many ran.
    ///
    /// Callbacks run without the registry lock held, so they may register
    /// further callbacks or re-enter the owning client.
    pub fn emit(&self, event: OidcEvent, payload: &EventPayload) -> usize {
        let callbacks = self
            .callbacks
            .read()
            .get(&event)
            .cloned()
            .unwrap_or_default();

        for callback in &callbacks {
            callback(payload);
        }
        callbacks.len()
    }

    /// Number of callbacks registered for `event`.
    #[must_use]
    pub fn listener_count(&self, event: OidcEvent) -> usize {
        self.callbacks.read().get(&event).map_or(0, Vec::len)
    }
}

impl std::fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: HashMap<OidcEvent, usize> = self
            .callbacks
            .read()
            .iter()
            .map(|(event, cbs)| (*event, cbs.len()))
            .collect();
        f.debug_struct("EventRegistry").field("callbacks", &counts).finish()
    }
}
