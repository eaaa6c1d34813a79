//! # OIDC Records
//!
//! Records produced by the OIDC client and carried inside store actions.
//! The store never interprets them beyond copying them into state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The authenticated principal as reported by the OIDC client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OidcUser {
    /// Raw ID token.
    pub id_token: String,
    /// Raw access token.
    pub access_token: String,
    /// Token type (usually `Bearer`).
    pub token_type: String,
    /// Space separated granted scopes.
    pub scope: String,
    /// Profile claims from the ID token / userinfo endpoint.
    pub profile: serde_json::Value,
    /// Access token expiry, seconds since the Unix epoch.
    pub expires_at: Option<u64>,
    /// Session state returned by the authorization server.
    pub session_state: Option<String>,
    /// Refresh token, when the flow issued one.
    pub refresh_token: Option<String>,
}

impl OidcUser {
    /// Subject claim, if the profile carries one.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.profile.get("sub").and_then(serde_json::Value::as_str)
    }

    /// Granted scopes split on whitespace.
    pub fn scopes(&self) -> impl Iterator<Item = &str> {
        self.scope.split_whitespace()
    }
}

/// Failure reported by the client's background token refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SilentRenewError {
    /// Human readable message.
    pub message: String,
    /// Protocol error code (e.g. `login_required`), when present.
    pub error: Option<String>,
}

impl SilentRenewError {
    /// Create an error with only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: None,
        }
    }

    /// Attach a protocol error code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.error = Some(code.into());
        self
    }
}

impl std::fmt::Display for SilentRenewError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.error {
            Some(code) => write!(f, "{} ({})", self.message, code),
            None => f.write_str(&self.message),
        }
    }
}

/// Caller supplied query parameters appended to sign-in / sign-out requests.
///
/// Passed through untouched; ordering is by key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtraQueryParams(BTreeMap<String, String>);

impl ExtraQueryParams {
    /// Empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Insert or replace a parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Look up a parameter.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Iterate parameters in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ExtraQueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
