//! Configuration file support for Trellis.
//!
//! `trellis.toml` lives at the project root and is entirely optional; every
//! field falls back to a default. A present but unparsable file is fatal.
//!
//! ```toml
//! [layout]
//! source-dir = "src"
//! output-dir = "bin"
//!
//! [scan]
//! exclude = ["secp256k1/**"]
//!
//! [solution]
//! name = "prologcoin"
//! toolset = "VS140"
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::ConfigError;
use crate::core::identifier::{Identifier, DEFAULT_SEED};
use crate::core::manifest::MANIFEST_NAME;
use crate::core::source_dir::Extensions;

/// Configuration file name looked up at the project root.
pub const CONFIG_NAME: &str = "trellis.toml";

/// Trellis configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory layout
    pub layout: LayoutConfig,

    /// Tree scanning settings
    pub scan: ScanConfig,

    /// Solution settings
    pub solution: SolutionConfig,
}

/// Where things live, relative to the project root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LayoutConfig {
    /// Root of the scanned source tree
    pub source_dir: PathBuf,

    /// Directory descriptors are written to; emitted paths are relative to it
    pub output_dir: PathBuf,

    /// Intermediate build files, one subdirectory per configuration
    pub intermediate_dir: PathBuf,

    /// Per-directory manifest file name
    pub manifest: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            source_dir: PathBuf::from("src"),
            output_dir: PathBuf::from("bin"),
            intermediate_dir: PathBuf::from("out"),
            manifest: MANIFEST_NAME.to_string(),
        }
    }
}

/// Tree scanning settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ScanConfig {
    /// Extensions of compiled sources (without the dot)
    pub source_extensions: Vec<String>,

    /// Extensions of headers (without the dot)
    pub header_extensions: Vec<String>,

    /// Directory name marking a test runnable
    pub test_suffix: String,

    /// Directory name marking a script runnable
    pub script_suffix: String,

    /// Glob patterns of source-root-relative directories to skip
    pub exclude: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        let extensions = Extensions::default();
        ScanConfig {
            source_extensions: extensions.source,
            header_extensions: extensions.header,
            test_suffix: "test".to_string(),
            script_suffix: "script".to_string(),
            exclude: Vec::new(),
        }
    }
}

impl ScanConfig {
    pub fn extensions(&self) -> Extensions {
        Extensions {
            source: self.source_extensions.clone(),
            header: self.header_extensions.clone(),
        }
    }
}

/// Solution settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SolutionConfig {
    /// Solution name, used by serializers as the file stem
    pub name: String,

    /// Explicit main target; otherwise the single executable, if unique
    pub main: Option<String>,

    /// Identifier seed; fixing it keeps regenerated output stable
    pub seed: String,

    /// Extension of per-target descriptor files
    pub project_extension: String,

    /// Visual Studio environment tag such as `VS140`
    pub toolset: Option<String>,
}

impl Default for SolutionConfig {
    fn default() -> Self {
        SolutionConfig {
            name: "solution".to_string(),
            main: None,
            seed: DEFAULT_SEED.to_string(),
            project_extension: "vcxproj".to_string(),
            toolset: None,
        }
    }
}

impl SolutionConfig {
    /// Parse the configured seed.
    pub fn seed(&self) -> Result<Identifier, ConfigError> {
        self.seed
            .parse()
            .map_err(|source| ConfigError::InvalidSeed {
                value: self.seed.clone(),
                source,
            })
    }

    /// Platform toolset derived from the environment tag, if any.
    pub fn platform_toolset(&self) -> Option<String> {
        self.toolset.as_deref().and_then(platform_toolset)
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::InvalidConfig {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&contents, path)
    }

    /// Load configuration, falling back to defaults if the file doesn't exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match fs::metadata(path) {
            Ok(_) => Self::load(path),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("no config at {}, using defaults", path.display());
                Ok(Config::default())
            }
            Err(e) => Err(ConfigError::InvalidConfig {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Parse configuration text. `path` is only used for error reporting.
    pub fn parse(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents).map_err(|e| ConfigError::InvalidConfig {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })?;
        // Surface a bad seed at load time rather than mid-generation.
        config.solution.seed()?;
        Ok(config)
    }
}

/// Map a Visual Studio environment tag to a platform toolset.
///
/// `VS140` becomes `v140`; every digit after the `VS` prefix is kept.
/// Tags not starting with `VS` yield `None`.
pub fn platform_toolset(env: &str) -> Option<String> {
    let digits: String = env
        .strip_prefix("VS")?
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    Some(format!("v{}", digits))
}
