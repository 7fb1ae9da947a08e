//! Implementation of `trellis generate`.
//!
//! Runs the whole pipeline against a workspace: scan, graph, assemble,
//! describe. Nothing is written here; the caller decides where the
//! resulting report goes.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::builder::descriptor::{describe_all, ProjectDescriptor};
use crate::builder::solution::{assemble, Solution, SolutionOptions};
use crate::core::identifier::IdAllocator;
use crate::core::target::TargetSet;
use crate::core::workspace::Workspace;
use crate::ops::scan::scan;
use crate::resolver::graph::DepGraph;

/// Scan the workspace with identifiers drawn from the configured seed.
pub fn scan_workspace(ws: &Workspace) -> Result<TargetSet> {
    let seed = ws.config().solution.seed()?;
    let mut ids = IdAllocator::new(seed);
    let targets = scan(ws, &mut ids)
        .with_context(|| format!("failed to scan {}", ws.source_dir().display()))?;
    Ok(targets)
}

/// Scan and build the direct dependency map.
pub fn resolve_workspace(ws: &Workspace) -> Result<(TargetSet, DepGraph)> {
    let targets = scan_workspace(ws)?;
    let graph = DepGraph::build(&targets);

    for (from, dep) in graph.unresolved() {
        tracing::warn!("unresolved dependency `{}` of `{}`", dep, from);
    }
    if let Err(cycle) = graph.build_order() {
        tracing::warn!("{}; emission order is unaffected", cycle);
    }

    Ok((targets, graph))
}

/// The result of one generation run.
#[derive(Debug, Serialize)]
pub struct Generation {
    pub solution: Solution,
    pub fingerprint: String,
    pub projects: Vec<ProjectDescriptor>,
}

/// Run the full pipeline.
pub fn generate(ws: &Workspace) -> Result<Generation> {
    let (targets, graph) = resolve_workspace(ws)?;
    let solution = assemble(targets, &graph, &SolutionOptions::from(&ws.config().solution))?;
    let projects = describe_all(&solution, ws);
    let fingerprint = solution.fingerprint();

    tracing::info!(
        "generated {} projects for `{}` ({})",
        projects.len(),
        solution.name(),
        &fingerprint[..12]
    );

    Ok(Generation {
        solution,
        fingerprint,
        projects,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::ConfigError;
    use crate::test_support::{trees, TreeFixture};

    #[test]
    fn test_generate_application() {
        let tree = trees::application();
        let generation = generate(&tree.workspace()).unwrap();

        assert_eq!(generation.solution.main(), Some("prologcoin"));
        assert_eq!(generation.projects.len(), generation.solution.len());
        assert_eq!(generation.projects[0].name, "prologcoin");
        assert_eq!(generation.fingerprint.len(), 64);
    }

    #[test]
    fn test_generate_is_reproducible() {
        let tree = trees::application();
        let first = generate(&tree.workspace()).unwrap();
        let second = generate(&tree.workspace()).unwrap();

        assert_eq!(first.fingerprint, second.fingerprint);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_empty_main_in_config_means_unset() {
        let tree = trees::application();
        tree.config("[solution]\nmain = \"\"\n");

        let generation = generate(&tree.workspace()).unwrap();
        assert_eq!(generation.solution.main(), Some("prologcoin"));
    }

    #[test]
    fn test_configured_seed_and_main() {
        let tree = trees::application();
        tree.config(
            "[solution]\nseed = \"00000000-0000-0000-0000-000000000000\"\nmain = \"interp\"\n",
        );
        let generation = generate(&tree.workspace()).unwrap();

        assert_eq!(generation.solution.main(), Some("interp"));
        // Allocation follows relative-dir order, so `common` comes first.
        let common = generation.solution.entry("common").unwrap();
        assert_eq!(
            common.target.id().to_string(),
            "{00000000-0000-0000-0000-000000000001}"
        );
    }

    #[test]
    fn test_error_propagates_with_context() {
        let tree = TreeFixture::new();
        tree.source("a", "a.cpp").manifest("a", "EXE\n");

        let err = generate(&tree.workspace()).unwrap_err();
        assert!(format!("{:#}", err).contains("failed to scan"));
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::ManifestMalformed { .. })
        ));
    }

    #[test]
    fn test_cycle_is_not_fatal() {
        let tree = TreeFixture::new();
        tree.source("a", "a.cpp")
            .manifest("a", "DEPENDS := b\n")
            .source("b", "b.cpp")
            .manifest("b", "DEPENDS := a\n");

        let generation = generate(&tree.workspace()).unwrap();
        assert_eq!(generation.solution.len(), 2);
    }
}
