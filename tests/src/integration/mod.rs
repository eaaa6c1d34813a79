//! Integration flows.

pub mod concurrency;
pub mod flows;
