//! # OIDC Facade Test Suite
//!
//! Cross-crate flows wiring the facade to the in-memory store and client.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── flows.rs        # session lifecycle through facade, client and store
//!     └── concurrency.rs  # events raised from several threads
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p oidc-tests
//! cargo test -p oidc-tests integration::flows
//! ```

#![allow(dead_code)]

pub mod integration;
