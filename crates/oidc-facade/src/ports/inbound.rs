//! # Inbound Ports
//!
//! What UI layers can ask of the facade.

use crate::application::AuthenticationLoaded;
use crate::domain::{
    ErrorState, EventCallback, ExtraQueryParams, FacadeError, OidcEvent, OidcUser, SigninRequest,
    SignoutRequest,
};
use async_trait::async_trait;
use oidc_store::Selection;

/// OIDC facade API - inbound port.
#[async_trait]
pub trait OidcFacadeApi: Send + Sync {
    // -------------------------------------------------------------------------
    // Derived state
    // -------------------------------------------------------------------------

    /// Whether the initial user lookup is still running.
    fn loading(&self) -> Selection<bool>;

    /// Whether the access token is about to expire.
    fn expiring(&self) -> Selection<bool>;

    /// Whether the access token has expired.
    fn expired(&self) -> Selection<bool>;

    /// The current principal.
    fn identity(&self) -> Selection<Option<OidcUser>>;

    /// Recorded failures.
    fn errors(&self) -> Selection<ErrorState>;

    /// One-shot signal: the first time loading is `false`.
    fn wait_for_authentication_loaded(&self) -> AuthenticationLoaded;

    // -------------------------------------------------------------------------
    // Commands (dispatched to the store)
    // -------------------------------------------------------------------------

    /// Load the cached user.
    fn get_oidc_user(&self);

    /// Remove the cached user.
    fn remove_oidc_user(&self);

    /// Sign in with a popup.
    fn signin_popup(&self, extra_query_params: Option<ExtraQueryParams>);

    /// Sign in with a full-page redirect.
    fn signin_redirect(&self, extra_query_params: Option<ExtraQueryParams>);

    /// Sign in silently.
    fn signin_silent(&self);

    /// Sign out with a popup.
    fn signout_popup(&self, extra_query_params: Option<ExtraQueryParams>);

    /// Sign out with a full-page redirect.
    fn signout_redirect(&self, extra_query_params: Option<ExtraQueryParams>);

    // -------------------------------------------------------------------------
    // Direct client delegation
    // -------------------------------------------------------------------------

    /// Prepare a sign-in request.
    async fn get_signin_url(
        &self,
        extra_query_params: Option<ExtraQueryParams>,
    ) -> Result<SigninRequest, FacadeError>;

    /// Prepare a sign-out request.
    async fn get_signout_url(
        &self,
        extra_query_params: Option<ExtraQueryParams>,
    ) -> Result<SignoutRequest, FacadeError>;

    /// Register an additional event callback with the client.
    fn register_event(&self, event: OidcEvent, callback: EventCallback);
}
