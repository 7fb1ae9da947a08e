//! Target definitions - what the solution is made of.
//!
//! A Target is one compilable unit discovered in the source tree: a static
//! library, a deliverable executable, or a runnable (test or script) that is
//! built and then executed against the thing it validates.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};

use crate::core::errors::ConfigError;
use crate::core::identifier::Identifier;
use crate::core::manifest::TargetManifest;
use crate::core::source_dir::SourceDirectory;

/// The kind of target being generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    /// Static library, the default for any source directory.
    Library,

    /// Executable declared with `EXE :=`.
    Executable,

    /// Built and executed during generation. Scripts additionally run
    /// against the active configuration's output directory.
    Runnable { is_script: bool },
}

impl TargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Library => "library",
            TargetKind::Executable => "executable",
            TargetKind::Runnable { is_script: false } => "test",
            TargetKind::Runnable { is_script: true } => "script",
        }
    }

    pub fn is_library(&self) -> bool {
        matches!(self, TargetKind::Library)
    }

    pub fn is_runnable(&self) -> bool {
        matches!(self, TargetKind::Runnable { .. })
    }

    pub fn is_script(&self) -> bool {
        matches!(self, TargetKind::Runnable { is_script: true })
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TargetKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// The directory one level above a runnable target.
///
/// Its declared dependencies and the target it produces form the context a
/// runnable is linked against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Owner {
    /// Name of the target the owning directory produces.
    pub name: String,
    /// Owning directory relative to the source root.
    pub relative_dir: String,
    /// Dependencies declared by the owning directory's manifest.
    pub dependencies: Vec<String>,
}

/// A classified target with its assigned identifier.
#[derive(Debug, Clone, Serialize)]
pub struct Target {
    name: String,
    kind: TargetKind,
    id: Identifier,
    relative_dir: String,
    #[serde(skip)]
    dir: PathBuf,
    manifest: TargetManifest,
    #[serde(skip_serializing_if = "Option::is_none")]
    owner: Option<Owner>,
    #[serde(skip)]
    files: SourceDirectory,
}

impl Target {
    /// Create a target. The identifier is fixed for the target's lifetime.
    pub fn new(
        name: impl Into<String>,
        kind: TargetKind,
        id: Identifier,
        relative_dir: impl Into<String>,
        files: SourceDirectory,
        manifest: TargetManifest,
        owner: Option<Owner>,
    ) -> Self {
        Target {
            name: name.into(),
            kind,
            id,
            relative_dir: relative_dir.into(),
            dir: files.path.clone(),
            manifest,
            owner,
            files,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> TargetKind {
        self.kind
    }

    pub fn id(&self) -> Identifier {
        self.id
    }

    /// Directory relative to the source root, `/`-separated.
    pub fn relative_dir(&self) -> &str {
        &self.relative_dir
    }

    /// Absolute directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn manifest(&self) -> &TargetManifest {
        &self.manifest
    }

    pub fn owner(&self) -> Option<&Owner> {
        self.owner.as_ref()
    }

    pub fn files(&self) -> &SourceDirectory {
        &self.files
    }

    /// Descriptor file name, e.g. `lib_a.vcxproj`.
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{}", self.name, extension)
    }
}

/// Flatten a `/`-separated relative directory into a target name.
///
/// `lib/b/test` becomes `lib_b_test`. The source root itself (empty relative
/// path) takes `root_name`.
pub fn flatten_name(relative_dir: &str, root_name: &str) -> String {
    if relative_dir.is_empty() {
        root_name.to_string()
    } else {
        relative_dir.replace('/', "_")
    }
}

/// Parent of a `/`-separated relative directory (`""` for top-level dirs).
pub fn parent_dir(relative_dir: &str) -> &str {
    relative_dir.rsplit_once('/').map_or("", |(parent, _)| parent)
}

/// The set of targets of one generation run, unique by name.
///
/// Targets keep insertion order, which the scanner makes the canonical
/// relative-path order.
#[derive(Debug, Default)]
pub struct TargetSet {
    targets: Vec<Target>,
    by_name: HashMap<String, usize>,
    by_dir: HashMap<String, usize>,
}

impl TargetSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a target, rejecting a name that is already taken.
    pub fn insert(&mut self, target: Target) -> Result<(), ConfigError> {
        if let Some(&existing) = self.by_name.get(target.name()) {
            return Err(ConfigError::DuplicateTarget {
                name: target.name().to_string(),
                first: self.targets[existing].dir().to_path_buf(),
                second: target.dir().to_path_buf(),
            });
        }

        let idx = self.targets.len();
        self.by_name.insert(target.name().to_string(), idx);
        self.by_dir.insert(target.relative_dir().to_string(), idx);
        self.targets.push(target);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Target> {
        self.by_name.get(name).map(|&i| &self.targets[i])
    }

    /// Target produced by a source-root-relative directory.
    pub fn by_relative_dir(&self, relative_dir: &str) -> Option<&Target> {
        self.by_dir.get(relative_dir).map(|&i| &self.targets[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn into_vec(self) -> Vec<Target> {
        self.targets
    }
}

impl<'a> IntoIterator for &'a TargetSet {
    type Item = &'a Target;
    type IntoIter = std::slice::Iter<'a, Target>;

    fn into_iter(self) -> Self::IntoIter {
        self.targets.iter()
    }
}
