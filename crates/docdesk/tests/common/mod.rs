//! Shared test utilities for docdesk integration tests.
//!
//! This module provides:
//! - `TestHarness` wiring a `DocumentManager` to a mock document store
//! - Builders for document JSON returned by the store

pub mod builders;
pub mod harness;

pub use builders::*;
pub use harness::{TestHarness, BEARER};
