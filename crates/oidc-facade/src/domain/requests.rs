//! # Navigation Requests
//!
//! Sign-in and sign-out requests produced by the client without navigating.

use serde::{Deserialize, Serialize};

/// A prepared authorization request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigninRequest {
    /// Full authorization URL, including query.
    pub url: String,
    /// Opaque `state` value echoed back on the callback.
    pub state: String,
    /// `nonce` bound into the ID token.
    pub nonce: String,
}

/// A prepared end-session request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignoutRequest {
    /// Full end-session URL, including query.
    pub url: String,
    /// Opaque `state` value, present when a post-logout redirect is used.
    pub state: Option<String>,
}
