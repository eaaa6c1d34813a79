//! # Domain Module
//!
//! Event kinds, payloads, requests and errors. User, error and parameter
//! records are shared with the store crate.

pub mod errors;
pub mod events;
pub mod requests;

pub use errors::*;
pub use events::*;
pub use requests::*;

pub use oidc_store::{ErrorState, ExtraQueryParams, OidcUser, SilentRenewError};
