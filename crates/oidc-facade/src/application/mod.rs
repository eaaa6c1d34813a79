//! # Application Layer
//!
//! The facade mediating between client and store.

pub mod facade;
pub mod readiness;

pub use facade::OidcFacade;
pub use readiness::AuthenticationLoaded;
