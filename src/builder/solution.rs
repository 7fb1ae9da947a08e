//! Solution assembly.
//!
//! Turns the classified targets and their dependency map into a flat,
//! ready-to-serialize list: main target first, then the remaining
//! libraries and executables, then tests and scripts, each group sorted by
//! descriptor file name. Ordering happens last and only affects emission;
//! identifiers were fixed by the scanner beforehand.

use std::cmp::Ordering;

use serde::Serialize;

use crate::core::errors::ConfigError;
use crate::core::identifier::Identifier;
use crate::core::target::{Target, TargetKind, TargetSet};
use crate::resolver::graph::DepGraph;
use crate::util::config::SolutionConfig;
use crate::util::hash::Fingerprint;

/// A dependency edge resolved to its target's identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedEdge {
    pub name: String,
    pub id: Identifier,
}

/// One target with its resolved direct dependencies.
#[derive(Debug, Clone, Serialize)]
pub struct SolutionEntry {
    pub target: Target,
    pub file_name: String,
    pub edges: Vec<ResolvedEdge>,
}

/// Settings the assembler needs from the configuration.
#[derive(Debug, Clone)]
pub struct SolutionOptions {
    pub name: String,
    /// Explicitly requested main target.
    pub main: Option<String>,
    /// Extension of descriptor files, used for ordering.
    pub project_extension: String,
}

impl From<&SolutionConfig> for SolutionOptions {
    fn from(config: &SolutionConfig) -> Self {
        SolutionOptions {
            name: config.name.clone(),
            main: config.main.clone(),
            project_extension: config.project_extension.clone(),
        }
    }
}

/// The ordered, dependency-annotated collection of all targets.
#[derive(Debug, Clone, Serialize)]
pub struct Solution {
    name: String,
    main: Option<String>,
    entries: Vec<SolutionEntry>,
}

impl Solution {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The designated main target, if any.
    pub fn main(&self) -> Option<&str> {
        self.main.as_deref()
    }

    /// Entries in emission order.
    pub fn entries(&self) -> &[SolutionEntry] {
        &self.entries
    }

    pub fn entry(&self, name: &str) -> Option<&SolutionEntry> {
        self.entries.iter().find(|e| e.target.name() == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Digest of everything a serializer would emit: order, names,
    /// identifiers, and edges. Equal across runs on unchanged input.
    pub fn fingerprint(&self) -> String {
        let mut fp = Fingerprint::new();
        fp.update_str(&self.name).update_opt(self.main.as_deref());
        for entry in &self.entries {
            fp.update_str(&entry.file_name)
                .update_str(entry.target.kind().as_str())
                .update_str(&entry.target.id().to_string());
            let ids: Vec<String> = entry.edges.iter().map(|e| e.id.to_string()).collect();
            fp.update_strs(entry.edges.iter().map(|e| e.name.as_str()))
                .update_strs(ids.iter().map(String::as_str))
                .update_str("");
        }
        fp.finish()
    }
}

/// Pick the main target.
///
/// An explicit choice must name a non-runnable target; an empty name counts
/// as no choice. Without one, the single executable is main; zero or several
/// executables mean no main.
pub fn select_main(
    targets: &TargetSet,
    explicit: Option<&str>,
) -> Result<Option<String>, ConfigError> {
    if let Some(name) = explicit.filter(|m| !m.is_empty()) {
        return match targets.get(name) {
            Some(t) if !t.kind().is_runnable() => Ok(Some(name.to_string())),
            _ => Err(ConfigError::UnknownMainTarget {
                name: name.to_string(),
            }),
        };
    }

    let mut executables = targets
        .iter()
        .filter(|t| t.kind() == TargetKind::Executable);
    match (executables.next(), executables.next()) {
        (Some(only), None) => Ok(Some(only.name().to_string())),
        _ => Ok(None),
    }
}

/// Emission order: main first, non-runnables before runnables, then by
/// descriptor file name.
pub fn emission_order(main: Option<&str>, a: &SolutionEntry, b: &SolutionEntry) -> Ordering {
    let rank = |e: &SolutionEntry| {
        if Some(e.target.name()) == main {
            0
        } else if e.target.kind().is_runnable() {
            2
        } else {
            1
        }
    };
    rank(a)
        .cmp(&rank(b))
        .then_with(|| a.file_name.cmp(&b.file_name))
}

/// Assemble the solution.
///
/// Every edge name is resolved against `targets`; names without a target
/// are dropped from the entry's edges.
pub fn assemble(
    targets: TargetSet,
    graph: &DepGraph,
    opts: &SolutionOptions,
) -> Result<Solution, ConfigError> {
    let main = select_main(&targets, opts.main.as_deref())?;

    let ids: std::collections::HashMap<String, Identifier> = targets
        .iter()
        .map(|t| (t.name().to_string(), t.id()))
        .collect();

    let mut entries: Vec<SolutionEntry> = targets
        .into_vec()
        .into_iter()
        .map(|target| {
            let edges = graph
                .edges(target.name())
                .iter()
                .filter_map(|dep| match ids.get(dep) {
                    Some(&id) => Some(ResolvedEdge {
                        name: dep.clone(),
                        id,
                    }),
                    None => {
                        tracing::warn!(
                            "`{}` depends on unknown target `{}`, edge dropped",
                            target.name(),
                            dep
                        );
                        None
                    }
                })
                .collect();
            SolutionEntry {
                file_name: target.file_name(&opts.project_extension),
                target,
                edges,
            }
        })
        .collect();

    entries.sort_by(|a, b| emission_order(main.as_deref(), a, b));

    Ok(Solution {
        name: opts.name.clone(),
        main,
        entries,
    })
}
