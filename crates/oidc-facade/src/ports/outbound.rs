//! # Outbound Ports
//!
//! The OIDC client capability the facade depends on. The store capability is
//! [`oidc_store::StateStore`].

use crate::domain::{
    EventCallback, EventPayload, EventRegistry, ExtraQueryParams, OidcClientError, OidcEvent,
    SigninRequest, SignoutRequest,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

pub use oidc_store::StateStore;

/// OIDC client - outbound port.
#[async_trait]
pub trait OidcClient: Send + Sync {
    /// Register a callback for an event kind.
    fn register_oidc_event(&self, event: OidcEvent, callback: EventCallback);

    /// Remove the cached user from client storage.
    fn remove_oidc_user(&self) -> Result<(), OidcClientError>;

    /// Prepare an authorization request without navigating.
    async fn get_signin_url(
        &self,
        extra_query_params: Option<ExtraQueryParams>,
    ) -> Result<SigninRequest, OidcClientError>;

    /// Prepare an end-session request without navigating.
    async fn get_signout_url(
        &self,
        extra_query_params: Option<ExtraQueryParams>,
    ) -> Result<SignoutRequest, OidcClientError>;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Mock client recording every call into a shared log.
#[derive(Default)]
pub struct MockOidcClient {
    /// Registered callbacks.
    pub registry: EventRegistry,
    /// Call log, shareable with a recording store.
    pub calls: Arc<Mutex<Vec<String>>>,
    /// Should calls return errors?
    pub should_fail: bool,
}

impl MockOidcClient {
    /// Mock writing into an existing log.
    pub fn with_log(calls: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            calls,
            ..Default::default()
        }
    }

    /// Fire an event at the registered callbacks.
    pub fn fire(&self, event: OidcEvent, payload: EventPayload) -> usize {
        self.registry.emit(event, &payload)
    }

    /// Snapshot of the call log.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().push(call);
    }

    fn query(extra_query_params: Option<&ExtraQueryParams>) -> String {
        extra_query_params
            .map(|params| {
                params
                    .iter()
                    .map(|(k, v)| format!("{k}={v}"))
                    .collect::<Vec<_>>()
                    .join("&")
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl OidcClient for MockOidcClient {
    fn register_oidc_event(&self, event: OidcEvent, callback: EventCallback) {
        self.record(format!("register_oidc_event:{event}"));
        self.registry.register(event, callback);
    }

    fn remove_oidc_user(&self) -> Result<(), OidcClientError> {
        self.record("remove_oidc_user".to_string());
        if self.should_fail {
            return Err(OidcClientError::Client("Mock failure".to_string()));
        }
        Ok(())
    }

    async fn get_signin_url(
        &self,
        extra_query_params: Option<ExtraQueryParams>,
    ) -> Result<SigninRequest, OidcClientError> {
        self.record("get_signin_url".to_string());
        if self.should_fail {
            return Err(OidcClientError::Client("Mock failure".to_string()));
        }
        Ok(SigninRequest {
            url: format!("mock://signin?{}", Self::query(extra_query_params.as_ref())),
            state: "mock-state".to_string(),
            nonce: "mock-nonce".to_string(),
        })
    }

    async fn get_signout_url(
        &self,
        extra_query_params: Option<ExtraQueryParams>,
    ) -> Result<SignoutRequest, OidcClientError> {
        self.record("get_signout_url".to_string());
        if self.should_fail {
            return Err(OidcClientError::Client("Mock failure".to_string()));
        }
        Ok(SignoutRequest {
            url: format!("mock://signout?{}", Self::query(extra_query_params.as_ref())),
            state: None,
        })
    }
}
