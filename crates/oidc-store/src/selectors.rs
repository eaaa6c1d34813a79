//! # Selectors
//!
//! Named projections of [`OidcState`] used with `StateStore::select`.

use crate::model::OidcUser;
use crate::state::{ErrorState, OidcState};

/// A pure projection of the store state.
pub type Selector<T> = fn(&OidcState) -> T;

/// Whether the initial user lookup is still running.
#[must_use]
pub fn get_oidc_loading(state: &OidcState) -> bool {
    state.loading
}

/// Whether the access token is about to expire.
#[must_use]
pub fn is_identity_expiring(state: &OidcState) -> bool {
    state.expiring
}

/// Whether the access token has expired.
#[must_use]
pub fn is_identity_expired(state: &OidcState) -> bool {
    state.expired
}

/// The current principal.
#[must_use]
pub fn get_oidc_identity(state: &OidcState) -> Option<OidcUser> {
    state.identity.clone()
}

/// All recorded errors.
#[must_use]
pub fn select_oidc_error_state(state: &OidcState) -> ErrorState {
    state.errors.clone()
}
