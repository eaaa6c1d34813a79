//! # Facade Configuration
//!
//! Client settings for the in-memory client plus store and wiring options.

use crate::domain::FacadeError;
use oidc_store::DEFAULT_CHANNEL_CAPACITY;
use serde::{Deserialize, Serialize};
use std::env;

/// Settings for building sign-in / sign-out requests.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// Authorization server base URL.
    pub authority: String,

    /// Registered client identifier.
    pub client_id: String,

    /// Callback URL for sign-in.
    pub redirect_uri: String,

    /// Where the server sends the browser after sign-out.
    pub post_logout_redirect_uri: Option<String>,

    /// OAuth2 response type (`code`, `id_token token`, ...).
    pub response_type: String,

    /// Requested scopes, space separated.
    pub scope: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            authority: "https://localhost:5001".to_string(),
            client_id: String::new(),
            redirect_uri: "http://localhost:4200/callback".to_string(),
            post_logout_redirect_uri: None,
            response_type: "code".to_string(),
            scope: "openid profile".to_string(),
        }
    }
}

/// Facade configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OidcConfig {
    /// Client settings.
    pub client: ClientSettings,

    /// Buffered actions per store subscriber.
    pub action_channel_capacity: usize,

    /// Register the event-to-action callbacks on construction.
    pub register_default_events: bool,
}

impl Default for OidcConfig {
    fn default() -> Self {
        Self {
            client: ClientSettings::default(),
            action_channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            register_default_events: true,
        }
    }
}

impl OidcConfig {
    /// A config for testing (fixed client, small channel).
    pub fn for_testing() -> Self {
        Self {
            client: ClientSettings {
                authority: "https://id.example.test".to_string(),
                client_id: "test-client".to_string(),
                redirect_uri: "https://app.example.test/callback".to_string(),
                post_logout_redirect_uri: Some("https://app.example.test/".to_string()),
                response_type: "code".to_string(),
                scope: "openid profile email".to_string(),
            },
            action_channel_capacity: 32,
            register_default_events: true,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `OIDC_AUTHORITY`: Authorization server URL
    /// - `OIDC_CLIENT_ID`: Client identifier
    /// - `OIDC_REDIRECT_URI`: Sign-in callback URL
    /// - `OIDC_POST_LOGOUT_REDIRECT_URI`: Sign-out landing URL (optional)
    /// - `OIDC_RESPONSE_TYPE`: Response type (default: code)
    /// - `OIDC_SCOPE`: Scopes (default: openid profile)
    /// - `OIDC_ACTION_CHANNEL_CAPACITY`: Store subscriber buffer
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let client = defaults.client;

        Self {
            client: ClientSettings {
                authority: env::var("OIDC_AUTHORITY").unwrap_or(client.authority),
                client_id: env::var("OIDC_CLIENT_ID").unwrap_or(client.client_id),
                redirect_uri: env::var("OIDC_REDIRECT_URI").unwrap_or(client.redirect_uri),
                post_logout_redirect_uri: env::var("OIDC_POST_LOGOUT_REDIRECT_URI")
                    .ok()
                    .or(client.post_logout_redirect_uri),
                response_type: env::var("OIDC_RESPONSE_TYPE").unwrap_or(client.response_type),
                scope: env::var("OIDC_SCOPE").unwrap_or(client.scope),
            },
            action_channel_capacity: env::var("OIDC_ACTION_CHANNEL_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.action_channel_capacity),
            register_default_events: defaults.register_default_events,
        }
    }

    /// Parse a JSON document; missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, FacadeError> {
        serde_json::from_str(json).map_err(|e| FacadeError::Config(e.to_string()))
    }
}
