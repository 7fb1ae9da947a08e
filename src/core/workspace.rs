//! Workspace - central configuration hub.
//!
//! A Workspace ties the project root to its configuration and resolves the
//! directories every other component works against.

use std::path::{Path, PathBuf};

use crate::core::errors::ConfigError;
use crate::core::manifest::IncludeContext;
use crate::util::config::{Config, CONFIG_NAME};
use crate::util::fs::normalize_path;

/// A project root with its resolved layout.
#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
    source_dir: PathBuf,
    output_dir: PathBuf,
    intermediate_dir: PathBuf,
    config: Config,
}

impl Workspace {
    /// Create a workspace for `root` with an already loaded configuration.
    ///
    /// Fails if the source directory does not exist. The output and
    /// intermediate directories are only used lexically and need not exist.
    pub fn new(root: &Path, config: Config) -> Result<Self, ConfigError> {
        let root = normalize_path(root);
        let source_dir = normalize_path(&root.join(&config.layout.source_dir));
        if !source_dir.is_dir() {
            return Err(ConfigError::SourceRootMissing { path: source_dir });
        }

        let output_dir = root.join(&config.layout.output_dir);
        let intermediate_dir = root.join(&config.layout.intermediate_dir);

        Ok(Workspace {
            root,
            source_dir,
            output_dir,
            intermediate_dir,
            config,
        })
    }

    /// Open the workspace at `root`, reading `trellis.toml` (or
    /// `config_path` when given).
    pub fn open(root: &Path, config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match config_path {
            Some(path) => Config::load(path)?,
            None => Config::load_or_default(&root.join(CONFIG_NAME))?,
        };
        Self::new(root, config)
    }

    /// Get the project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the scanned source tree root.
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Get the output directory emitted paths are relative to.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Get the intermediate directory for `configuration` (e.g. `debug`).
    pub fn intermediate_dir(&self, configuration: &str) -> PathBuf {
        self.intermediate_dir.join(configuration)
    }

    /// Get the binary output directory for `configuration`.
    pub fn binary_dir(&self, configuration: &str) -> PathBuf {
        self.output_dir.join(configuration)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Name given to a target living directly in the source root.
    pub fn root_target_name(&self) -> String {
        self.source_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "root".to_string())
    }

    /// Anchors for `$(ROOT)` include entries.
    pub fn include_context(&self) -> IncludeContext<'_> {
        IncludeContext {
            root: &self.root,
            output_dir: &self.output_dir,
        }
    }
}

/// Find the project root: the nearest ancestor of `start` holding
/// `trellis.toml`.
pub fn find_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(CONFIG_NAME).is_file())
        .map(Path::to_path_buf)
}
