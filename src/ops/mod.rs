//! High-level operations.
//!
//! This module contains the implementation of Trellis commands.

pub mod generate;
pub mod scan;

pub use generate::{generate, resolve_workspace, scan_workspace, Generation};
pub use scan::scan;
