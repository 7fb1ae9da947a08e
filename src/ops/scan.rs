//! Tree scanning: discover and classify target directories.
//!
//! Every directory under the source root that directly contains a compiled
//! source becomes a target. Directory listings and manifests are read in
//! parallel, but identifiers are handed out afterwards, sequentially, in
//! relative-path order, so the walk order never shows up in the output.

use std::path::{Path, PathBuf};

use glob::Pattern;
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::core::errors::ConfigError;
use crate::core::identifier::IdAllocator;
use crate::core::manifest::TargetManifest;
use crate::core::source_dir::{Extensions, SourceDirectory};
use crate::core::target::{flatten_name, parent_dir, Owner, Target, TargetKind, TargetSet};
use crate::core::workspace::Workspace;

/// Reserved directory names that turn a directory into a runnable target.
#[derive(Debug, Clone, Copy)]
pub struct RunnableSuffixes<'a> {
    pub test: &'a str,
    pub script: &'a str,
}

/// Classify a target directory.
///
/// An `EXE` declaration wins; otherwise a final path segment equal to one of
/// the reserved names makes a runnable; everything else is a library.
pub fn classify(
    relative_dir: &str,
    manifest: &TargetManifest,
    suffixes: RunnableSuffixes<'_>,
) -> TargetKind {
    if manifest.is_executable() {
        return TargetKind::Executable;
    }
    match relative_dir.rsplit('/').next() {
        Some(last) if !last.is_empty() && last == suffixes.test => {
            TargetKind::Runnable { is_script: false }
        }
        Some(last) if !last.is_empty() && last == suffixes.script => {
            TargetKind::Runnable { is_script: true }
        }
        _ => TargetKind::Library,
    }
}

/// A classified directory still waiting for its identifier.
struct Candidate {
    relative_dir: String,
    name: String,
    kind: TargetKind,
    files: SourceDirectory,
    manifest: TargetManifest,
    owner: Option<Owner>,
}

struct Scanner<'a> {
    ws: &'a Workspace,
    extensions: Extensions,
    suffixes: RunnableSuffixes<'a>,
    excludes: Vec<Pattern>,
    root_name: String,
}

/// Scan the workspace's source tree and assign identifiers from `ids`.
pub fn scan(ws: &Workspace, ids: &mut IdAllocator) -> Result<TargetSet, ConfigError> {
    let scan_config = &ws.config().scan;
    let excludes = scan_config
        .exclude
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|source| ConfigError::InvalidPattern {
                pattern: p.clone(),
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let scanner = Scanner {
        ws,
        extensions: scan_config.extensions(),
        suffixes: RunnableSuffixes {
            test: &scan_config.test_suffix,
            script: &scan_config.script_suffix,
        },
        excludes,
        root_name: ws.root_target_name(),
    };

    let dirs = scanner.collect_dirs()?;
    tracing::debug!("inspecting {} directories", dirs.len());

    // Results keep the walk's sorted order, so the first error reported is
    // the same on every run.
    let inspected: Vec<Result<Option<Candidate>, ConfigError>> = dirs
        .par_iter()
        .map(|(dir, rel)| scanner.inspect(dir, rel))
        .collect();

    let mut candidates = Vec::new();
    for result in inspected {
        if let Some(candidate) = result? {
            candidates.push(candidate);
        }
    }
    candidates.sort_by(|a, b| a.relative_dir.cmp(&b.relative_dir));

    let mut targets = TargetSet::new();
    for c in candidates {
        let id = ids.next_id();
        tracing::info!("{} `{}` ({}) {}", c.kind, c.name, display_dir(&c.relative_dir), id);
        targets.insert(Target::new(
            c.name,
            c.kind,
            id,
            c.relative_dir,
            c.files,
            c.manifest,
            c.owner,
        ))?;
    }

    Ok(targets)
}

impl Scanner<'_> {
    /// Every directory under the source root, excluded subtrees pruned.
    fn collect_dirs(&self) -> Result<Vec<(PathBuf, String)>, ConfigError> {
        let root = self.ws.source_dir();
        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                if !entry.file_type().is_dir() {
                    return false;
                }
                let rel = relative_dir(root, entry.path());
                rel.is_empty() || !self.excludes.iter().any(|p| p.matches(&rel))
            });

        let mut dirs = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().map_or_else(|| root.to_path_buf(), Path::to_path_buf);
                ConfigError::SourceRootUnreadable {
                    path,
                    source: e.into(),
                }
            })?;
            let rel = relative_dir(root, entry.path());
            dirs.push((entry.into_path(), rel));
        }
        Ok(dirs)
    }

    fn inspect(&self, dir: &Path, rel: &str) -> Result<Option<Candidate>, ConfigError> {
        let files = SourceDirectory::read(dir, &self.extensions).map_err(|source| {
            ConfigError::SourceRootUnreadable {
                path: dir.to_path_buf(),
                source,
            }
        })?;
        if !files.is_target_dir() {
            tracing::debug!("skipping {} (no sources)", display_dir(rel));
            return Ok(None);
        }

        let manifest = self.load_manifest(dir)?;
        let kind = classify(rel, &manifest, self.suffixes);
        let name = manifest
            .executable_name
            .clone()
            .unwrap_or_else(|| flatten_name(rel, &self.root_name));
        let owner = if kind.is_runnable() {
            Some(self.owner_of(rel)?)
        } else {
            None
        };

        Ok(Some(Candidate {
            relative_dir: rel.to_string(),
            name,
            kind,
            files,
            manifest,
            owner,
        }))
    }

    /// The directory one level up from a runnable, whether or not it holds
    /// sources itself.
    fn owner_of(&self, rel: &str) -> Result<Owner, ConfigError> {
        let owner_rel = parent_dir(rel);
        let owner_dir = join_relative(self.ws.source_dir(), owner_rel);
        let manifest = self.load_manifest(&owner_dir)?;

        Ok(Owner {
            name: manifest
                .executable_name
                .unwrap_or_else(|| flatten_name(owner_rel, &self.root_name)),
            relative_dir: owner_rel.to_string(),
            dependencies: manifest.dependencies,
        })
    }

    fn load_manifest(&self, dir: &Path) -> Result<TargetManifest, ConfigError> {
        TargetManifest::load(
            dir,
            &self.ws.config().layout.manifest,
            self.ws.include_context(),
        )
    }
}

/// `path` relative to `root`, `/`-separated (`""` for the root itself).
fn relative_dir(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .map(|rel| {
            rel.components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/")
        })
        .unwrap_or_default()
}

fn join_relative(root: &Path, rel: &str) -> PathBuf {
    rel.split('/')
        .filter(|s| !s.is_empty())
        .fold(root.to_path_buf(), |path, seg| path.join(seg))
}

fn display_dir(rel: &str) -> &str {
    if rel.is_empty() {
        "."
    } else {
        rel
    }
}
