//! Core data structures for Trellis.
//!
//! This module contains the foundational types used throughout Trellis:
//! - Deterministic target identifiers
//! - Per-directory manifests and source listings
//! - Targets and the set of targets of one run
//! - Workspace management

pub mod errors;
pub mod identifier;
pub mod manifest;
pub mod source_dir;
pub mod target;
pub mod workspace;

pub use errors::ConfigError;
pub use identifier::{IdAllocator, Identifier};
pub use manifest::{TargetManifest, MANIFEST_NAME};
pub use source_dir::SourceDirectory;
pub use target::{Target, TargetKind, TargetSet};
pub use workspace::{find_root, Workspace};
