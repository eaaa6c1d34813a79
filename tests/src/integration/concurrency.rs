//! # Concurrent Event Relay
//!
//! Events raised from several threads at once must each reach the store
//! exactly once.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use oidc_facade::{OidcConfig, OidcFacade, OidcFacadeApi};
    use oidc_store::{ActionFilter, ActionKind};

    const THREADS: usize = 8;
    const EVENTS_PER_THREAD: usize = 25;

    #[test]
    fn test_parallel_events_each_dispatch_once() {
        let config = OidcConfig {
            action_channel_capacity: THREADS * EVENTS_PER_THREAD * 2,
            ..OidcConfig::for_testing()
        };
        let facade = Arc::new(OidcFacade::in_memory(&config));
        let mut actions = facade.store().subscribe(ActionFilter::client_events());

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let client = Arc::clone(facade.client());
                thread::spawn(move || {
                    for _ in 0..EVENTS_PER_THREAD {
                        client.change_session();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("relay thread panicked");
        }

        let relayed = actions.drain();
        assert_eq!(relayed.len(), THREADS * EVENTS_PER_THREAD);
        assert!(relayed
            .iter()
            .all(|action| action.kind() == ActionKind::OnSessionChanged));
        assert_eq!(
            facade.store().actions_dispatched(),
            (THREADS * EVENTS_PER_THREAD) as u64
        );
    }

    #[test]
    fn test_commands_from_many_threads() {
        let config = OidcConfig {
            action_channel_capacity: 512,
            ..OidcConfig::for_testing()
        };
        let facade = Arc::new(OidcFacade::in_memory(&config));
        let mut silent = facade
            .store()
            .subscribe(ActionFilter::kinds(vec![ActionKind::SigninSilent]));

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let facade = Arc::clone(&facade);
                thread::spawn(move || {
                    for _ in 0..EVENTS_PER_THREAD {
                        facade.signin_silent();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("command thread panicked");
        }

        assert_eq!(silent.drain().len(), THREADS * EVENTS_PER_THREAD);
    }
}
