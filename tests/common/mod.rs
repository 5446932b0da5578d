#![allow(dead_code)]

//! Common test utilities and helpers
//!
//! This module provides shared utilities for all tests including:
//! - Message and participant fixtures
//! - A scripted in-memory transport
//! - Invariant assertions

pub mod assertions;
pub mod fixtures;

// Re-export commonly used utilities
pub use assertions::*;
pub use fixtures::*;
pub use mock_transport::*;
