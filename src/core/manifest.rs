//! Per-directory target manifests.
//!
//! A manifest is a small make-style file living next to the sources of a
//! target directory:
//!
//! ```text
//! EXE          := tool
//! DEPENDS      := common interp
//! INCLUDE_DIRS := $(ROOT)/third_party/boost /opt/include
//! CFLAGS       := /W4 /permissive-
//! RUN_ARGS     := --quiet
//! ```
//!
//! Lines whose first token is not a recognized key are ignored, and only the
//! first assignment of each key is honored. A directory without a manifest
//! simply has no extra configuration.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;

use crate::core::errors::ConfigError;
use crate::util::fs::relative;

/// Default manifest file name.
pub const MANIFEST_NAME: &str = "build.mk";

/// Prefix marking an include directory as relative to the project root.
pub const ROOT_TOKEN: &str = "$(ROOT)";

/// Keys understood by the reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManifestKey {
    Exe,
    Depends,
    IncludeDirs,
    CFlags,
    RunArgs,
}

impl ManifestKey {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "EXE" => Some(ManifestKey::Exe),
            "DEPENDS" => Some(ManifestKey::Depends),
            "INCLUDE_DIRS" => Some(ManifestKey::IncludeDirs),
            "CFLAGS" => Some(ManifestKey::CFlags),
            "RUN_ARGS" => Some(ManifestKey::RunArgs),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ManifestKey::Exe => "EXE",
            ManifestKey::Depends => "DEPENDS",
            ManifestKey::IncludeDirs => "INCLUDE_DIRS",
            ManifestKey::CFlags => "CFLAGS",
            ManifestKey::RunArgs => "RUN_ARGS",
        }
    }
}

/// Where `$(ROOT)` include entries are anchored and re-expressed.
#[derive(Debug, Clone, Copy)]
pub struct IncludeContext<'a> {
    /// Project root the token stands for.
    pub root: &'a Path,
    /// Directory the resolved entry is made relative to.
    pub output_dir: &'a Path,
}

impl IncludeContext<'_> {
    fn resolve(&self, entry: &str) -> String {
        match entry.strip_prefix(ROOT_TOKEN) {
            Some(rest) => {
                let rest = rest.trim_start_matches(['/', '\\']);
                let absolute = if rest.is_empty() {
                    self.root.to_path_buf()
                } else {
                    self.root.join(rest)
                };
                relative(&absolute, self.output_dir)
            }
            None => entry.to_string(),
        }
    }
}

/// Parsed contents of one manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TargetManifest {
    /// Declared executable name; turns the directory into an executable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executable_name: Option<String>,

    /// Declared dependency names, in declaration order, duplicates kept.
    pub dependencies: Vec<String>,

    /// Extra include directories, `$(ROOT)` entries already resolved.
    pub extra_include_dirs: Vec<String>,

    /// Opaque extra compiler arguments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_compiler_args: Option<String>,

    /// Opaque default arguments for running the produced binary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_run_args: Option<String>,
}

impl TargetManifest {
    /// Parse manifest text. `path` is only used for error reporting.
    pub fn parse(
        contents: &str,
        path: &Path,
        includes: IncludeContext<'_>,
    ) -> Result<Self, ConfigError> {
        let mut manifest = TargetManifest::default();
        let mut seen = HashSet::new();

        // Editors on Windows often save with a byte order mark.
        let contents = contents.strip_prefix('\u{feff}').unwrap_or(contents);
        for (idx, raw) in contents.lines().enumerate() {
            let line = raw.trim();
            let key_end = line
                .find(|c: char| c.is_whitespace() || c == ':' || c == '=')
                .unwrap_or(line.len());
            let Some(key) = ManifestKey::from_token(&line[..key_end]) else {
                continue;
            };
            if !seen.insert(key) {
                continue;
            }

            let malformed = |message: String| ConfigError::ManifestMalformed {
                path: path.to_path_buf(),
                line: idx + 1,
                message,
            };

            let rest = line[key_end..].trim_start();
            let value = rest
                .strip_prefix(":=")
                .or_else(|| rest.strip_prefix('='))
                .ok_or_else(|| malformed(format!("expected `:=` after `{}`", key.as_str())))?
                .trim();

            match key {
                ManifestKey::Exe => {
                    let mut tokens = value.split_whitespace();
                    match (tokens.next(), tokens.next()) {
                        (Some(name), None) => manifest.executable_name = Some(name.to_string()),
                        (None, _) => return Err(malformed("`EXE` needs a name".into())),
                        (Some(_), Some(_)) => {
                            return Err(malformed(format!(
                                "`EXE` takes a single name, got `{}`",
                                value
                            )))
                        }
                    }
                }
                ManifestKey::Depends => {
                    manifest.dependencies = value.split_whitespace().map(String::from).collect();
                }
                ManifestKey::IncludeDirs => {
                    manifest.extra_include_dirs = value
                        .split_whitespace()
                        .map(|entry| includes.resolve(entry))
                        .collect();
                }
                ManifestKey::CFlags => manifest.extra_compiler_args = non_empty(value),
                ManifestKey::RunArgs => manifest.default_run_args = non_empty(value),
            }
        }

        Ok(manifest)
    }

    /// Read `file_name` from `dir`.
    ///
    /// Returns `Ok(None)` when the file does not exist; any other read
    /// failure (including non-UTF-8 content) is fatal.
    pub fn read(
        dir: &Path,
        file_name: &str,
        includes: IncludeContext<'_>,
    ) -> Result<Option<Self>, ConfigError> {
        let path = dir.join(file_name);
        match fs::read_to_string(&path) {
            Ok(contents) => Self::parse(&contents, &path, includes).map(Some),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(ConfigError::ManifestUnreadable { path, source }),
        }
    }

    /// Like [`TargetManifest::read`], with a missing file yielding the empty manifest.
    pub fn load(
        dir: &Path,
        file_name: &str,
        includes: IncludeContext<'_>,
    ) -> Result<Self, ConfigError> {
        Ok(Self::read(dir, file_name, includes)?.unwrap_or_default())
    }

    /// Whether the manifest declares an executable.
    pub fn is_executable(&self) -> bool {
        self.executable_name.is_some()
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
