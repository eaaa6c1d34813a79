//! # OIDC Actions
//!
//! Every action that can be dispatched against the OIDC store.

use crate::model::{ExtraQueryParams, OidcUser, SilentRenewError};
use serde::{Deserialize, Serialize};

/// All actions understood by the OIDC reducer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OidcAction {
    // =========================================================================
    // USER LOOKUP
    // =========================================================================
    /// Ask for the cached user to be loaded.
    GetOidcUser,

    /// Ask for the cached user to be removed.
    RemoveOidcUser,

    /// A cached user was found.
    UserFound(OidcUser),

    /// Loading finished without a user.
    UserDoneLoading,

    /// Loading failed.
    UserDoneLoadingError(String),

    // =========================================================================
    // CLIENT EVENTS
    // =========================================================================
    /// The access token has expired.
    OnAccessTokenExpired,

    /// The access token is about to expire.
    OnAccessTokenExpiring,

    /// Background token refresh failed.
    OnSilentRenewError(SilentRenewError),

    /// A user session was established or refreshed.
    OnUserLoaded(OidcUser),

    /// The user session was removed.
    OnUserUnloaded,

    /// The user signed out at the authorization server.
    OnUserSignedOut,

    /// The session at the authorization server changed.
    OnSessionChanged,

    // =========================================================================
    // COMMANDS
    // =========================================================================
    /// Start a popup sign-in.
    SigninPopup(Option<ExtraQueryParams>),

    /// Start a redirect sign-in.
    SigninRedirect(Option<ExtraQueryParams>),

    /// Start a silent (iframe / refresh token) sign-in.
    SigninSilent,

    /// Start a popup sign-out.
    SignoutPopup(Option<ExtraQueryParams>),

    /// Start a redirect sign-out.
    SignoutRedirect(Option<ExtraQueryParams>),

    /// A sign-in attempt failed.
    SigninError(String),

    /// A sign-out attempt failed.
    SignoutError(String),
}

impl OidcAction {
    /// Get the kind of this action (for filtering and metrics).
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::GetOidcUser => ActionKind::GetOidcUser,
            Self::RemoveOidcUser => ActionKind::RemoveOidcUser,
            Self::UserFound(_) => ActionKind::UserFound,
            Self::UserDoneLoading => ActionKind::UserDoneLoading,
            Self::UserDoneLoadingError(_) => ActionKind::UserDoneLoadingError,
            Self::OnAccessTokenExpired => ActionKind::OnAccessTokenExpired,
            Self::OnAccessTokenExpiring => ActionKind::OnAccessTokenExpiring,
            Self::OnSilentRenewError(_) => ActionKind::OnSilentRenewError,
            Self::OnUserLoaded(_) => ActionKind::OnUserLoaded,
            Self::OnUserUnloaded => ActionKind::OnUserUnloaded,
            Self::OnUserSignedOut => ActionKind::OnUserSignedOut,
            Self::OnSessionChanged => ActionKind::OnSessionChanged,
            Self::SigninPopup(_) => ActionKind::SigninPopup,
            Self::SigninRedirect(_) => ActionKind::SigninRedirect,
            Self::SigninSilent => ActionKind::SigninSilent,
            Self::SignoutPopup(_) => ActionKind::SignoutPopup,
            Self::SignoutRedirect(_) => ActionKind::SignoutRedirect,
            Self::SigninError(_) => ActionKind::SigninError,
            Self::SignoutError(_) => ActionKind::SignoutError,
        }
    }

    /// Stable action type string.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.kind().type_name()
    }

    /// Extra query parameters carried by command actions.
    #[must_use]
    pub fn extra_query_params(&self) -> Option<&ExtraQueryParams> {
        match self {
            Self::SigninPopup(p)
            | Self::SigninRedirect(p)
            | Self::SignoutPopup(p)
            | Self::SignoutRedirect(p) => p.as_ref(),
            _ => None,
        }
    }
}

/// Action kinds for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    GetOidcUser,
    RemoveOidcUser,
    UserFound,
    UserDoneLoading,
    UserDoneLoadingError,
    OnAccessTokenExpired,
    OnAccessTokenExpiring,
    OnSilentRenewError,
    OnUserLoaded,
    OnUserUnloaded,
    OnUserSignedOut,
    OnSessionChanged,
    SigninPopup,
    SigninRedirect,
    SigninSilent,
    SignoutPopup,
    SignoutRedirect,
    SigninError,
    SignoutError,
}

impl ActionKind {
    /// Stable `[Oidc] ...` type string, also used as the metrics label.
    #[must_use]
    pub fn type_name(self) -> &'static str {
        match self {
            Self::GetOidcUser => "[Oidc] get oidc user",
            Self::RemoveOidcUser => "[Oidc] remove oidc user",
            Self::UserFound => "[Oidc] user found",
            Self::UserDoneLoading => "[Oidc] user done loading",
            Self::UserDoneLoadingError => "[Oidc] user done loading error",
            Self::OnAccessTokenExpired => "[Oidc] on access token expired",
            Self::OnAccessTokenExpiring => "[Oidc] on access token expiring",
            Self::OnSilentRenewError => "[Oidc] on silent renew error",
            Self::OnUserLoaded => "[Oidc] on user loaded",
            Self::OnUserUnloaded => "[Oidc] on user unloaded",
            Self::OnUserSignedOut => "[Oidc] on user signed out",
            Self::OnSessionChanged => "[Oidc] on session changed",
            Self::SigninPopup => "[Oidc] signin popup",
            Self::SigninRedirect => "[Oidc] signin redirect",
            Self::SigninSilent => "[Oidc] signin silent",
            Self::SignoutPopup => "[Oidc] signout popup",
            Self::SignoutRedirect => "[Oidc] signout redirect",
            Self::SigninError => "[Oidc] signin error",
            Self::SignoutError => "[Oidc] signout error",
        }
    }

    /// True for actions that originate from client events.
    #[must_use]
    pub fn is_client_event(self) -> bool {
        matches!(
            self,
            Self::OnAccessTokenExpired
                | Self::OnAccessTokenExpiring
                | Self::OnSilentRenewError
                | Self::OnUserLoaded
                | Self::OnUserUnloaded
                | Self::OnUserSignedOut
                | Self::OnSessionChanged
        )
    }
}

/// Filter for subscribing to specific actions.
#[derive(Debug, Clone, Default)]
pub struct ActionFilter {
    /// Kinds to include. Empty means all kinds.
    pub kinds: Vec<ActionKind>,
}

impl ActionFilter {
    /// Create a filter that accepts all actions.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific kinds.
    #[must_use]
    pub fn kinds(kinds: Vec<ActionKind>) -> Self {
        Self { kinds }
    }

    /// Create a filter for actions relayed from client events.
    #[must_use]
    pub fn client_events() -> Self {
        Self::kinds(vec![
            ActionKind::OnAccessTokenExpired,
            ActionKind::OnAccessTokenExpiring,
            ActionKind::OnSilentRenewError,
            ActionKind::OnUserLoaded,
            ActionKind::OnUserUnloaded,
            ActionKind::OnUserSignedOut,
            ActionKind::OnSessionChanged,
        ])
    }

    /// Check if an action matches this filter.
    #[must_use]
    pub fn matches(&self, action: &OidcAction) -> bool {
        self.kinds.is_empty() || self.kinds.contains(&action.kind())
    }
}
