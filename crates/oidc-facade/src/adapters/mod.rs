//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implements the outbound client port.

mod in_memory_client;

pub use in_memory_client::InMemoryOidcClient;
