//! Common test utilities for doxytag integration tests.
//!
//! This module provides:
//! - `TestEnv`: Isolated workspace with a source directory and config home
//! - Fixtures: Reusable LPK-style source files

#![allow(dead_code)]

pub mod env;
pub mod fixtures;

pub use env::*;
pub use fixtures::*;
