//! Trellis - solution generator for C and C++ source trees
//!
//! This crate provides the core library functionality for Trellis,
//! including tree scanning, dependency graph construction, and solution
//! assembly.

pub mod builder;
pub mod core;
pub mod ops;
pub mod resolver;
pub mod util;

/// Test utilities for Trellis unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides on-disk source tree fixtures.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{
    errors::ConfigError,
    identifier::{IdAllocator, Identifier},
    manifest::TargetManifest,
    target::{Target, TargetKind, TargetSet},
    workspace::Workspace,
};

pub use crate::builder::Solution;
pub use crate::resolver::DepGraph;
pub use crate::util::config::Config;
