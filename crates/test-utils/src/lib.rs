//! Shared test utilities for the map generator workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Feature-layer fixtures written to temporary directories
//! - Map extents used across tests
//! - A minimal PNG chunk reader for checking encoder output
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{feature_dir, png_info};
//! ```

pub mod fixtures;
pub mod png;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use png::*;
