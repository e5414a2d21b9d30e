//! Test utilities for integration testing.
//!
//! This module provides:
//! - Test data factories for creating valid test fixtures
//! - In-memory store implementations for mocking persistence
//! - A builder for constructing `AppState` with test dependencies

mod account_mocks;
mod app_state_builder;
mod factories;

pub use account_mocks::*;
pub use app_state_builder::*;
pub use factories::*;
