//! Test utilities for Trellis unit tests.
//!
//! Provides on-disk source tree fixtures so scanner, graph, and solution
//! tests can share one way of laying out directories and manifests.
//!
//! # Example
//!
//! ```rust,ignore
//! use trellis::test_support::TreeFixture;
//!
//! let tree = TreeFixture::new();
//! tree.source("lib/a", "a.cpp").manifest("lib/b", "DEPENDS := a");
//! let ws = tree.workspace();
//! ```

pub mod fixtures;

// Re-export fixtures for convenience
pub use fixtures::*;
