//! Configuration errors.
//!
//! Every variant is fatal: generation stops and nothing is emitted. Soft
//! conditions (unresolved dependency names, missing manifests) never reach
//! this type.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::util::diagnostic::{suggestions, Diagnostic};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("source root `{}` does not exist or is not a directory", path.display())]
    SourceRootMissing { path: PathBuf },

    #[error("failed to traverse `{}`", path.display())]
    SourceRootUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read manifest `{}`", path.display())]
    ManifestUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed manifest `{}` at line {line}: {message}", path.display())]
    ManifestMalformed {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("duplicate target name `{name}`")]
    DuplicateTarget {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("main target `{name}` is not a known executable or library target")]
    UnknownMainTarget { name: String },

    #[error("invalid identifier seed `{value}`")]
    InvalidSeed {
        value: String,
        #[source]
        source: uuid::Error,
    },

    #[error("invalid configuration `{}`: {message}", path.display())]
    InvalidConfig { path: PathBuf, message: String },

    #[error("invalid exclude pattern `{pattern}`")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

impl ConfigError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.to_string());
        match self {
            ConfigError::SourceRootMissing { path } => diag
                .with_location(path)
                .with_suggestion(suggestions::SOURCE_DIR),
            ConfigError::SourceRootUnreadable { path, source } => {
                diag.with_location(path).with_context(source.to_string())
            }
            ConfigError::ManifestUnreadable { path, source } => diag
                .with_location(path)
                .with_context(source.to_string())
                .with_suggestion(suggestions::MANIFEST_ENCODING),
            ConfigError::ManifestMalformed { path, .. } => diag
                .with_location(path)
                .with_suggestion(suggestions::MANIFEST_SYNTAX),
            ConfigError::DuplicateTarget {
                name,
                first,
                second,
            } => diag
                .with_context(format!("`{}` is produced by {}", name, first.display()))
                .with_context(format!("`{}` is produced by {}", name, second.display()))
                .with_suggestion(suggestions::DUPLICATE_TARGET),
            ConfigError::UnknownMainTarget { .. } => {
                diag.with_suggestion(suggestions::LIST_TARGETS)
            }
            ConfigError::InvalidSeed { source, .. } => diag.with_context(source.to_string()),
            ConfigError::InvalidConfig { path, .. } => diag.with_location(path),
            ConfigError::InvalidPattern { source, .. } => diag.with_context(source.to_string()),
        }
    }
}
