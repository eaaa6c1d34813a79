//! # Session Lifecycle Flows
//!
//! Drives the facade with the in-memory client and store:
//!
//! ```text
//! [InMemoryOidcClient] ──event──→ [OidcFacade] ──action──→ [InMemoryStore]
//!                                      ↑                         │
//!                                   commands                  select()
//!                                      │                         ↓
//!                                   [caller] ←── loading / identity / errors
//! ```

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use parking_lot::Mutex;
    use tokio::time::timeout;
    use tokio_stream::StreamExt;

    use oidc_facade::{
        EventPayload, ExtraQueryParams, InMemoryOidcClient, OidcConfig, OidcEvent, OidcFacade,
        OidcFacadeApi, OidcUser, SilentRenewError,
    };
    use oidc_store::{ActionFilter, ActionKind, InMemoryStore, OidcAction, StateStore};
    use oidc_telemetry::OIDC_EVENTS_RECEIVED;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn facade() -> OidcFacade<InMemoryStore, InMemoryOidcClient> {
        OidcFacade::in_memory(&OidcConfig::for_testing())
    }

    fn alice() -> OidcUser {
        OidcUser {
            id_token: "eyJ.alice.sig".to_string(),
            access_token: "at-alice".to_string(),
            token_type: "Bearer".to_string(),
            scope: "openid profile email".to_string(),
            profile: serde_json::json!({ "sub": "alice", "email": "alice@example.test" }),
            expires_at: Some(1_900_000_000),
            session_state: Some("s1".to_string()),
            refresh_token: None,
        }
    }

    // =============================================================================
    // LIFECYCLE
    // =============================================================================

    #[tokio::test]
    async fn test_sign_in_to_sign_out_lifecycle() {
        let facade = facade();
        let mut actions = facade.store().subscribe(ActionFilter::all());
        let client = Arc::clone(facade.client());

        facade.get_oidc_user();
        assert!(facade.store().snapshot().loading);

        client.load_user(alice());
        timeout(Duration::from_millis(200), facade.authentication_loaded())
            .await
            .expect("timeout")
            .expect("store open");

        let mut identity = facade.identity();
        assert_eq!(identity.next().await, Some(Some(alice())));

        client.raise_access_token_expiring();
        client.raise_silent_renew_error(SilentRenewError::new("iframe timed out"));
        client.raise_access_token_expired();
        assert!(facade.store().snapshot().expired);

        client.sign_out();
        assert_eq!(client.removals(), 1);
        assert!(client.user().is_none());
        assert_eq!(identity.next().await, Some(None));

        let kinds: Vec<ActionKind> = actions.drain().iter().map(OidcAction::kind).collect();
        assert_eq!(
            kinds,
            vec![
                ActionKind::GetOidcUser,
                ActionKind::OnUserLoaded,
                ActionKind::OnAccessTokenExpiring,
                ActionKind::OnSilentRenewError,
                ActionKind::OnAccessTokenExpired,
                ActionKind::OnUserSignedOut,
            ]
        );
    }

    #[tokio::test]
    async fn test_loaded_without_user() {
        let facade = facade();
        let loaded = facade.wait_for_authentication_loaded();

        facade.get_oidc_user();
        // What the store's effects would dispatch when storage is empty
        facade.store().dispatch(OidcAction::UserDoneLoading);

        let value = timeout(Duration::from_millis(200), loaded.wait())
            .await
            .expect("timeout");
        assert_eq!(value, Some(false));
        assert!(facade.store().snapshot().identity.is_none());
    }

    #[tokio::test]
    async fn test_loaded_signal_survives_immediate_reload() {
        let facade = facade();
        let loaded = facade.wait_for_authentication_loaded();
        let mut loading = facade.loading();

        facade.client().load_user(alice());
        facade.get_oidc_user();
        assert!(facade.store().snapshot().loading);

        let value = timeout(Duration::from_millis(200), loaded.wait())
            .await
            .expect("timeout");
        assert_eq!(value, Some(false));

        let mut seen = Vec::new();
        for _ in 0..3 {
            seen.push(loading.next().await);
        }
        assert_eq!(seen, vec![Some(true), Some(false), Some(true)]);
    }

    #[tokio::test]
    async fn test_errors_stream_reports_renew_failure() {
        let facade = facade();
        let mut errors = facade.errors();
        assert!(errors.next().await.unwrap().is_clear());

        let failure = SilentRenewError::new("login required").with_code("login_required");
        facade.client().raise_silent_renew_error(failure.clone());

        let state = timeout(Duration::from_millis(200), errors.next())
            .await
            .expect("timeout")
            .unwrap();
        assert_eq!(state.silent_renew_error, Some(failure));
    }

    // =============================================================================
    // COMMANDS AND URLS
    // =============================================================================

    #[tokio::test]
    async fn test_redirect_commands_carry_params_to_store() {
        let facade = facade();
        let mut commands = facade.store().subscribe(ActionFilter::kinds(vec![
            ActionKind::SigninRedirect,
            ActionKind::SignoutRedirect,
        ]));
        let params = ExtraQueryParams::new().with("kc_idp_hint", "github");

        facade.signin_redirect(Some(params.clone()));
        facade.signin_silent();
        facade.signout_redirect(None);

        let received = commands.drain();
        assert_eq!(
            received,
            vec![
                OidcAction::SigninRedirect(Some(params.clone())),
                OidcAction::SignoutRedirect(None),
            ]
        );
        assert_eq!(received[0].extra_query_params(), Some(&params));
    }

    #[tokio::test]
    async fn test_url_requests_use_client_settings() {
        let facade = facade();
        let mut actions = facade.store().subscribe(ActionFilter::all());
        facade.client().store_user(alice());

        let signin = facade
            .get_signin_url(Some(ExtraQueryParams::new().with("prompt", "consent")))
            .await
            .unwrap();
        assert!(signin.url.starts_with("https://id.example.test/authorize?"));
        assert!(signin.url.contains("prompt=consent"));
        assert!(signin.url.contains(&format!("state={}", signin.state)));

        let signout = facade.get_signout_url(None).await.unwrap();
        assert!(signout.url.contains("id_token_hint=eyJ.alice.sig"));
        assert!(signout.state.is_some());

        assert!(actions.drain().is_empty());
    }

    // =============================================================================
    // EXTENSION POINT AND WIRING OPTIONS
    // =============================================================================

    #[tokio::test]
    async fn test_custom_callback_sees_same_payload_as_store() {
        let facade = facade();
        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);
        facade.register_event(
            OidcEvent::UserLoaded,
            Arc::new(move |payload: &EventPayload| {
                if let EventPayload::User(user) = payload {
                    *sink.lock() = Some(user.clone());
                }
            }),
        );

        assert_eq!(facade.client().load_user(alice()), 2);
        assert_eq!(*seen.lock(), Some(alice()));
        assert_eq!(facade.store().snapshot().identity, Some(alice()));
    }

    #[test]
    fn test_default_wiring_can_be_disabled() {
        let config = OidcConfig::from_json_str(
            r#"{ "client": { "client_id": "spa" }, "register_default_events": false }"#,
        )
        .unwrap();
        let facade = OidcFacade::in_memory(&config);
        let mut actions = facade.store().subscribe(ActionFilter::all());

        assert_eq!(facade.client().listener_count(OidcEvent::UserLoaded), 0);
        assert_eq!(facade.client().load_user(alice()), 0);
        assert!(actions.drain().is_empty());
        assert!(facade.store().snapshot().identity.is_none());
    }

    #[test]
    fn test_relayed_events_are_counted() {
        let counter = OIDC_EVENTS_RECEIVED.with_label_values(&["UserSessionChanged"]);
        let before = counter.get();

        let facade = facade();
        facade.client().change_session();
        facade.client().change_session();

        assert!(counter.get() >= before + 2.0);
    }
}
