//! # OIDC Facade
//!
//! Relays client events to the store as actions and forwards commands.
//!
//! | Client event | Store action |
//! |---|---|
//! | `AccessTokenExpired` | `OnAccessTokenExpired` |
//! | `AccessTokenExpiring` | `OnAccessTokenExpiring` |
//! | `SilentRenewError(e)` | `OnSilentRenewError(e)` |
//! | `UserLoaded(user)` | `OnUserLoaded(user)` |
//! | `UserUnloaded` | `OnUserUnloaded` |
//! | `UserSignedOut` | client `remove_oidc_user()`, then `OnUserSignedOut` |
//! | `UserSessionChanged` | `OnSessionChanged` |

use async_trait::async_trait;
use oidc_store::{
    get_oidc_identity, get_oidc_loading, is_identity_expired, is_identity_expiring,
    select_oidc_error_state, InMemoryStore, OidcAction, Selection, StateStore,
};
use oidc_telemetry::{metric_inc, OIDC_ACTIONS_DISPATCHED, OIDC_CLIENT_ERRORS, OIDC_EVENTS_RECEIVED};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::adapters::InMemoryOidcClient;
use crate::application::AuthenticationLoaded;
use crate::config::OidcConfig;
use crate::domain::{
    ErrorState, EventCallback, EventPayload, ExtraQueryParams, FacadeError, OidcEvent, OidcUser,
    SigninRequest, SignoutRequest,
};
use crate::ports::{OidcClient, OidcFacadeApi};

/// Mediator between an OIDC client and a state store.
pub struct OidcFacade<S, C>
where
    S: StateStore + 'static,
    C: OidcClient + 'static,
{
    store: Arc<S>,
    client: Arc<C>,
}

impl<S, C> OidcFacade<S, C>
where
    S: StateStore + 'static,
    C: OidcClient + 'static,
{
    /// Create a facade and register the default event callbacks.
    pub fn new(store: Arc<S>, client: Arc<C>) -> Self {
        let facade = Self { store, client };
        facade.register_default_events();
        facade
    }

    /// Create a facade, registering default callbacks only if configured.
    pub fn with_config(store: Arc<S>, client: Arc<C>, config: &OidcConfig) -> Self {
        let facade = Self { store, client };
        if config.register_default_events {
            facade.register_default_events();
        } else {
            debug!("Default OIDC event callbacks disabled by configuration");
        }
        facade
    }

    /// The store this facade dispatches to.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// The client this facade listens to.
    pub fn client(&self) -> &Arc<C> {
        &self.client
    }

    /// Resolve once loading is `false`.
    ///
    /// Fails with [`FacadeError::StoreClosed`] if the store goes away first.
    pub async fn authentication_loaded(&self) -> Result<(), FacadeError> {
        match self.wait_for_authentication_loaded().wait().await {
            Some(_) => Ok(()),
            None => Err(FacadeError::StoreClosed),
        }
    }

    fn register_default_events(&self) {
        for event in OidcEvent::ALL {
            self.client
                .register_oidc_event(event, self.default_callback(event));
        }
        debug!(events = OidcEvent::ALL.len(), "Default OIDC event callbacks registered");
    }

    fn default_callback(&self, event: OidcEvent) -> EventCallback {
        let store = Arc::clone(&self.store);
        let client = Arc::clone(&self.client);
        Arc::new(move |payload: &EventPayload| {
            relay_event(store.as_ref(), client.as_ref(), event, payload);
        })
    }

    fn dispatch(&self, action: OidcAction) {
        dispatch(self.store.as_ref(), action);
    }
}

impl OidcFacade<InMemoryStore, InMemoryOidcClient> {
    /// Facade over a fresh in-memory store and client.
    pub fn in_memory(config: &OidcConfig) -> Self {
        let store = Arc::new(InMemoryStore::with_capacity(config.action_channel_capacity));
        let client = Arc::new(InMemoryOidcClient::from_config(config));
        Self::with_config(store, client, config)
    }
}

/// Turn one client event into at most one store action.
fn relay_event<S, C>(store: &S, client: &C, event: OidcEvent, payload: &EventPayload)
where
    S: StateStore,
    C: OidcClient,
{
    metric_inc!(OIDC_EVENTS_RECEIVED, &[event.name()]);
    debug!(event = event.name(), "OIDC event received");

    let action = match (event, payload) {
        (OidcEvent::AccessTokenExpired, _) => OidcAction::OnAccessTokenExpired,
        (OidcEvent::AccessTokenExpiring, _) => OidcAction::OnAccessTokenExpiring,
        (OidcEvent::SilentRenewError, EventPayload::Error(error)) => {
            OidcAction::OnSilentRenewError(error.clone())
        }
        (OidcEvent::UserLoaded, EventPayload::User(user)) => OidcAction::OnUserLoaded(user.clone()),
        (OidcEvent::UserUnloaded, _) => OidcAction::OnUserUnloaded,
        (OidcEvent::UserSignedOut, _) => {
            if let Err(e) = client.remove_oidc_user() {
                metric_inc!(OIDC_CLIENT_ERRORS, &["remove_oidc_user"]);
                warn!(error = %e, "Failed to remove user after sign-out");
            }
            OidcAction::OnUserSignedOut
        }
        (OidcEvent::UserSessionChanged, _) => OidcAction::OnSessionChanged,
        (OidcEvent::SilentRenewError | OidcEvent::UserLoaded, other) => {
            warn!(event = event.name(), payload = ?other, "OIDC event payload mismatch, dropped");
            return;
        }
    };

    dispatch(store, action);
}

fn dispatch<S: StateStore>(store: &S, action: OidcAction) {
    metric_inc!(OIDC_ACTIONS_DISPATCHED, &[action.type_name()]);
    store.dispatch(action);
}

#[async_trait]
impl<S, C> OidcFacadeApi for OidcFacade<S, C>
where
    S: StateStore + 'static,
    C: OidcClient + 'static,
{
    fn loading(&self) -> Selection<bool> {
        self.store.select(get_oidc_loading)
    }

    fn expiring(&self) -> Selection<bool> {
        self.store.select(is_identity_expiring)
    }

    fn expired(&self) -> Selection<bool> {
        self.store.select(is_identity_expired)
    }

    fn identity(&self) -> Selection<Option<OidcUser>> {
        self.store.select(get_oidc_identity)
    }

    fn errors(&self) -> Selection<ErrorState> {
        self.store.select(select_oidc_error_state)
    }

    fn wait_for_authentication_loaded(&self) -> AuthenticationLoaded {
        AuthenticationLoaded::new(self.loading())
    }

    fn get_oidc_user(&self) {
        self.dispatch(OidcAction::GetOidcUser);
    }

    fn remove_oidc_user(&self) {
        self.dispatch(OidcAction::RemoveOidcUser);
    }

    fn signin_popup(&self, extra_query_params: Option<ExtraQueryParams>) {
        self.dispatch(OidcAction::SigninPopup(extra_query_params));
    }

    fn signin_redirect(&self, extra_query_params: Option<ExtraQueryParams>) {
        self.dispatch(OidcAction::SigninRedirect(extra_query_params));
    }

    fn signin_silent(&self) {
        self.dispatch(OidcAction::SigninSilent);
    }

    fn signout_popup(&self, extra_query_params: Option<ExtraQueryParams>) {
        self.dispatch(OidcAction::SignoutPopup(extra_query_params));
    }

    fn signout_redirect(&self, extra_query_params: Option<ExtraQueryParams>) {
        self.dispatch(OidcAction::SignoutRedirect(extra_query_params));
    }

    async fn get_signin_url(
        &self,
        extra_query_params: Option<ExtraQueryParams>,
    ) -> Result<SigninRequest, FacadeError> {
        self.client
            .get_signin_url(extra_query_params)
            .await
            .map_err(|e| {
                metric_inc!(OIDC_CLIENT_ERRORS, &["get_signin_url"]);
                FacadeError::from(e)
            })
    }

    async fn get_signout_url(
        &self,
        extra_query_params: Option<ExtraQueryParams>,
    ) -> Result<SignoutRequest, FacadeError> {
        self.client
            .get_signout_url(extra_query_params)
            .await
            .map_err(|e| {
                metric_inc!(OIDC_CLIENT_ERRORS, &["get_signout_url"]);
                FacadeError::from(e)
            })
    }

    fn register_event(&self, event: OidcEvent, callback: EventCallback) {
        self.client.register_oidc_event(event, callback);
    }
}
