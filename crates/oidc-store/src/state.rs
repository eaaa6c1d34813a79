//! # OIDC State
//!
//! The store-owned projection of the client's session and the reducer that
//! folds actions into it.

use crate::actions::OidcAction;
use crate::model::{OidcUser, SilentRenewError};
use serde::{Deserialize, Serialize};

/// Last error seen per failure path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorState {
    /// Last background refresh failure.
    pub silent_renew_error: Option<SilentRenewError>,
    /// Last sign-in failure.
    pub sign_in_error: Option<String>,
    /// Last sign-out failure.
    pub sign_out_error: Option<String>,
}

impl ErrorState {
    /// True when no error is recorded.
    #[must_use]
    pub fn is_clear(&self) -> bool {
        self.silent_renew_error.is_none()
            && self.sign_in_error.is_none()
            && self.sign_out_error.is_none()
    }
}

/// Store state for the OIDC session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OidcState {
    /// Current principal, if signed in.
    pub identity: Option<OidcUser>,
    /// True until the first user lookup has completed.
    pub loading: bool,
    /// The access token is about to expire.
    pub expiring: bool,
    /// The access token has expired.
    pub expired: bool,
    /// Recorded failures.
    pub errors: ErrorState,
}

impl Default for OidcState {
    fn default() -> Self {
        Self {
            identity: None,
            loading: true,
            expiring: false,
            expired: false,
            errors: ErrorState::default(),
        }
    }
}

/// Fold one action into the state.
///
/// Actions with no state effect return an unchanged clone.
#[must_use]
pub fn reduce(state: &OidcState, action: &OidcAction) -> OidcState {
    let mut next = state.clone();
    match action {
        OidcAction::GetOidcUser | OidcAction::RemoveOidcUser => {
            next.loading = true;
        }
        OidcAction::UserFound(user) | OidcAction::OnUserLoaded(user) => {
            next.identity = Some(user.clone());
            next.loading = false;
            next.expiring = false;
            next.expired = false;
            next.errors.silent_renew_error = None;
        }
        OidcAction::UserDoneLoading | OidcAction::UserDoneLoadingError(_) => {
            next.loading = false;
        }
        OidcAction::OnUserUnloaded | OidcAction::OnUserSignedOut => {
            next.identity = None;
            next.loading = false;
            next.expiring = false;
            next.expired = false;
        }
        OidcAction::OnAccessTokenExpiring => {
            next.expiring = true;
        }
        OidcAction::OnAccessTokenExpired => {
            next.expired = true;
            next.expiring = false;
        }
        OidcAction::OnSilentRenewError(error) => {
            next.errors.silent_renew_error = Some(error.clone());
        }
        OidcAction::SigninPopup(_) | OidcAction::SigninRedirect(_) | OidcAction::SigninSilent => {
            next.errors.sign_in_error = None;
        }
        OidcAction::SignoutPopup(_) | OidcAction::SignoutRedirect(_) => {
            next.errors.sign_out_error = None;
        }
        OidcAction::SigninError(message) => {
            next.errors.sign_in_error = Some(message.clone());
        }
        OidcAction::SignoutError(message) => {
            next.errors.sign_out_error = Some(message.clone());
        }
        OidcAction::OnSessionChanged => {}
    }
    next
}
