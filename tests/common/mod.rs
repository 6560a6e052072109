//! Common test utilities for hn-best-stories integration tests

#[allow(dead_code)]
pub mod fixtures;

pub use fixtures::*;
