//! # OIDC Facade
//!
//! Binds an OpenID-Connect client's lifecycle events to a state store and
//! forwards sign-in / sign-out commands.
//!
//! **Architecture:** Hexagonal (Ports/Adapters)
//!
//! ## Responsibilities
//!
//! | Part | Behavior |
//! |------|----------|
//! | Event relay | Each of the seven client events dispatches one store action |
//! | Commands | `signin_*` / `signout_*` / user lookup dispatch one action each |
//! | URL requests | `get_signin_url` / `get_signout_url` go straight to the client |
//! | Derived state | `loading`, `expiring`, `expired`, `identity`, `errors` selections |
//! | Readiness | `wait_for_authentication_loaded` emits once, on the first `false` |
//!
//! Protocol flows, token validation and renew timing belong to the client.
//!
//! ## Module Structure
//!
//! ```text
//! oidc-facade/
//! ├── domain/          # OidcEvent, EventPayload, requests, errors
//! ├── ports/           # OidcFacadeApi (inbound) + OidcClient (outbound)
//! ├── application/     # OidcFacade, AuthenticationLoaded
//! ├── adapters/        # InMemoryOidcClient
//! └── config.rs        # OidcConfig, ClientSettings
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use oidc_facade::{OidcConfig, OidcFacade, OidcFacadeApi};
//!
//! let facade = OidcFacade::in_memory(&OidcConfig::from_env());
//! facade.get_oidc_user();
//! facade.authentication_loaded().await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::InMemoryOidcClient;
pub use application::{AuthenticationLoaded, OidcFacade};
pub use config::{ClientSettings, OidcConfig};
pub use domain::{
    ErrorState, EventCallback, EventPayload, EventRegistry, ExtraQueryParams, FacadeError,
    OidcClientError, OidcEvent, OidcUser, SigninRequest, SignoutRequest, SilentRenewError,
};
pub use ports::{MockOidcClient, OidcClient, OidcFacadeApi, StateStore};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
