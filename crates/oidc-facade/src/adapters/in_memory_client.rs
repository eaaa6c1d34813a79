//! In-memory OIDC client.
//!
//! Implements [`OidcClient`] with a local event registry, a cached user slot
//! and request builders driven by [`ClientSettings`]. Events are raised
//! explicitly by the host (or by tests) instead of by a browser session.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, trace};
use url::Url;
use uuid::Uuid;

use crate::config::{ClientSettings, OidcConfig};
use crate::domain::{
    EventCallback, EventPayload, EventRegistry, ExtraQueryParams, OidcClientError, OidcEvent,
    OidcUser, SigninRequest, SignoutRequest, SilentRenewError,
};
use crate::ports::OidcClient;

/// OIDC client keeping its user and callbacks in memory.
#[derive(Debug)]
pub struct InMemoryOidcClient {
    settings: ClientSettings,
    registry: EventRegistry,
    user: RwLock<Option<OidcUser>>,
    removals: AtomicU64,
}

impl InMemoryOidcClient {
    /// Create a client with the given settings.
    pub fn new(settings: ClientSettings) -> Self {
        Self {
            settings,
            registry: EventRegistry::new(),
            user: RwLock::new(None),
            removals: AtomicU64::new(0),
        }
    }

    /// Create a client from the facade configuration.
    pub fn from_config(config: &OidcConfig) -> Self {
        Self::new(config.client.clone())
    }

    /// Client settings.
    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// The cached user, if any.
    pub fn user(&self) -> Option<OidcUser> {
        self.user.read().clone()
    }

    /// Cache a user without raising any event.
    pub fn store_user(&self, user: OidcUser) {
        *self.user.write() = Some(user);
    }

    /// How many times `remove_oidc_user` has been called.
    pub fn removals(&self) -> u64 {
        self.removals.load(Ordering::Relaxed)
    }

    /// Number of callbacks registered for `event`.
    pub fn listener_count(&self, event: OidcEvent) -> usize {
        self.registry.listener_count(event)
    }

    /// Raise an event; returns the number of callbacks invoked.
    pub fn raise(&self, event: OidcEvent, payload: EventPayload) -> usize {
        let invoked = self.registry.emit(event, &payload);
        trace!(event = event.name(), callbacks = invoked, "OIDC event raised");
        invoked
    }

    /// Cache `user` and raise `UserLoaded`.
    pub fn load_user(&self, user: OidcUser) -> usize {
        self.store_user(user.clone());
        self.raise(OidcEvent::UserLoaded, EventPayload::User(user))
    }

    /// Drop the cached user and raise `UserUnloaded`.
    pub fn unload_user(&self) -> usize {
        self.user.write().take();
        self.raise(OidcEvent::UserUnloaded, EventPayload::None)
    }

    /// Raise `AccessTokenExpiring`.
    pub fn raise_access_token_expiring(&self) -> usize {
        self.raise(OidcEvent::AccessTokenExpiring, EventPayload::None)
    }

    /// Raise `AccessTokenExpired`.
    pub fn raise_access_token_expired(&self) -> usize {
        self.raise(OidcEvent::AccessTokenExpired, EventPayload::None)
    }

    /// Raise `SilentRenewError` with `error`.
    pub fn raise_silent_renew_error(&self, error: SilentRenewError) -> usize {
        self.raise(OidcEvent::SilentRenewError, EventPayload::Error(error))
    }

    /// Raise `UserSignedOut`.
    pub fn sign_out(&self) -> usize {
        self.raise(OidcEvent::UserSignedOut, EventPayload::None)
    }

    /// Raise `UserSessionChanged`.
    pub fn change_session(&self) -> usize {
        self.raise(OidcEvent::UserSessionChanged, EventPayload::None)
    }

    /// `{authority}/{path}`, keeping any path already on the authority.
    fn endpoint(&self, path: &str) -> Result<Url, OidcClientError> {
        let mut url = Url::parse(&self.settings.authority)?;
        url.path_segments_mut()
            .map_err(|_| {
                OidcClientError::InvalidSettings(format!(
                    "authority cannot be a base URL: {}",
                    self.settings.authority
                ))
            })?
            .pop_if_empty()
            .push(path);
        Ok(url)
    }

    fn new_opaque_value() -> String {
        Uuid::new_v4().simple().to_string()
    }
}

#[async_trait]
impl OidcClient for InMemoryOidcClient {
    fn register_oidc_event(&self, event: OidcEvent, callback: EventCallback) {
        self.registry.register(event, callback);
        debug!(event = event.name(), "OIDC event callback registered");
    }

    fn remove_oidc_user(&self) -> Result<(), OidcClientError> {
        self.removals.fetch_add(1, Ordering::Relaxed);
        let removed = self.user.write().take();
        debug!(had_user = removed.is_some(), "Cached OIDC user removed");
        Ok(())
    }

    async fn get_signin_url(
        &self,
        extra_query_params: Option<ExtraQueryParams>,
    ) -> Result<SigninRequest, OidcClientError> {
        if self.settings.client_id.is_empty() {
            return Err(OidcClientError::InvalidSettings(
                "client_id is required".to_string(),
            ));
        }

        let state = Self::new_opaque_value();
        let nonce = Self::new_opaque_value();
        let mut url = self.endpoint("authorize")?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("client_id", &self.settings.client_id)
                .append_pair("redirect_uri", &self.settings.redirect_uri)
                .append_pair("response_type", &self.settings.response_type)
                .append_pair("scope", &self.settings.scope)
                .append_pair("state", &state)
                .append_pair("nonce", &nonce);
            for (key, value) in extra_query_params.iter().flat_map(ExtraQueryParams::iter) {
                query.append_pair(key, value);
            }
        }

        Ok(SigninRequest {
            url: url.into(),
            state,
            nonce,
        })
    }

    async fn get_signout_url(
        &self,
        extra_query_params: Option<ExtraQueryParams>,
    ) -> Result<SignoutRequest, OidcClientError> {
        let mut url = self.endpoint("logout")?;
        let id_token = self
            .user
            .read()
            .as_ref()
            .map(|user| user.id_token.clone())
            .filter(|token| !token.is_empty());

        let mut state = None;
        {
            let mut query = url.query_pairs_mut();
            if let Some(id_token) = &id_token {
                query.append_pair("id_token_hint", id_token);
            }
            if let Some(redirect) = &self.settings.post_logout_redirect_uri {
                let value = Self::new_opaque_value();
                query
                    .append_pair("post_logout_redirect_uri", redirect)
                    .append_pair("state", &value);
                state = Some(value);
            }
            for (key, value) in extra_query_params.iter().flat_map(ExtraQueryParams::iter) {
                query.append_pair(key, value);
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }

        Ok(SignoutRequest {
            url: url.into(),
            state,
        })
    }
}
