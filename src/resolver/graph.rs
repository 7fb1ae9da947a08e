//! Dependency graph - direct edges between targets, keyed by name.
//!
//! Edges are one level deep: if `a` depends on `b` and `b` on `c`, the list
//! for `a` holds `b` only. Declaration order and duplicates are kept.
//! Names that match no target stay in the map verbatim; the solution
//! assembler drops them when resolving identifiers.

use std::collections::{BTreeMap, HashMap};

use petgraph::algo::toposort;
use petgraph::graph::DiGraph;
use thiserror::Error;

use crate::core::target::{parent_dir, Target, TargetSet};

/// A cycle among known targets. Only reported; emission is linear anyway.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("dependency cycle through `{target}`")]
pub struct DependencyCycle {
    pub target: String,
}

/// Name-keyed adjacency map over all targets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepGraph {
    edges: BTreeMap<String, Vec<String>>,
}

impl DepGraph {
    /// Build the adjacency map.
    ///
    /// Libraries and executables get their manifest's `DEPENDS` list. A
    /// runnable gets its owning directory's `DEPENDS` list followed by the
    /// owner itself, so it always links against what it runs.
    pub fn build(targets: &TargetSet) -> Self {
        let mut edges = BTreeMap::new();

        for target in targets {
            let list = match target.owner().filter(|_| target.kind().is_runnable()) {
                Some(owner) => {
                    let mut list = canonicalize(targets, &owner.relative_dir, &owner.dependencies);
                    list.push(owner.name.clone());
                    list
                }
                None => canonicalize(
                    targets,
                    target.relative_dir(),
                    &target.manifest().dependencies,
                ),
            };
            tracing::debug!("{} -> [{}]", target.name(), list.join(", "));
            edges.insert(target.name().to_string(), list);
        }

        DepGraph { edges }
    }

    /// Direct dependencies of `name` (empty for unknown names).
    pub fn edges(&self, name: &str) -> &[String] {
        self.edges.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All `(target, dependencies)` pairs, sorted by target name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.edges.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// `(target, dependency)` pairs whose dependency names no target.
    pub fn unresolved(&self) -> Vec<(&str, &str)> {
        let known = &self.edges;
        self.iter()
            .flat_map(move |(from, deps)| {
                deps.iter()
                    .filter(move |dep| !known.contains_key(dep.as_str()))
                    .map(move |dep| (from, dep.as_str()))
            })
            .collect()
    }

    /// Known targets ordered dependencies-first.
    ///
    /// Unresolved names are ignored. A cycle yields an error naming one
    /// target on it.
    pub fn build_order(&self) -> Result<Vec<String>, DependencyCycle> {
        let mut graph = DiGraph::<&str, ()>::new();
        let nodes: HashMap<&str, _> = self
            .edges
            .keys()
            .map(|name| (name.as_str(), graph.add_node(name.as_str())))
            .collect();

        for (from, deps) in self.iter() {
            for dep in deps {
                if let (Some(&a), Some(&b)) = (nodes.get(from), nodes.get(dep.as_str())) {
                    graph.update_edge(a, b, ());
                }
            }
        }

        // toposort puts dependents first; reverse to build dependencies first.
        match toposort(&graph, None) {
            Ok(order) => Ok(order.into_iter().rev().map(|n| graph[n].to_string()).collect()),
            Err(cycle) => Err(DependencyCycle {
                target: graph[cycle.node_id()].to_string(),
            }),
        }
    }
}

/// Look up a declared dependency name.
///
/// In order: an exact target name, the sibling directory of the declaring
/// directory, then the name read as a source-root-relative directory.
pub fn lookup<'a>(targets: &'a TargetSet, declaring_dir: &str, name: &str) -> Option<&'a Target> {
    if let Some(target) = targets.get(name) {
        return Some(target);
    }
    let parent = parent_dir(declaring_dir);
    let sibling = if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", parent, name)
    };
    targets
        .by_relative_dir(&sibling)
        .or_else(|| targets.by_relative_dir(name.trim_matches('/')))
}

fn canonicalize(targets: &TargetSet, declaring_dir: &str, names: &[String]) -> Vec<String> {
    names
        .iter()
        .map(|name| match lookup(targets, declaring_dir, name) {
            Some(target) => target.name().to_string(),
            None => name.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identifier::IdAllocator;
    use crate::ops::scan::scan;
    use crate::test_support::{trees, TreeFixture};

    fn graph_of(tree: &TreeFixture) -> (TargetSet, DepGraph) {
        let set = scan(&tree.workspace(), &mut IdAllocator::default()).unwrap();
        let graph = DepGraph::build(&set);
        (set, graph)
    }

    fn position(order: &[String], name: &str) -> usize {
        order.iter().position(|n| n == name).unwrap()
    }

    #[test]
    fn test_library_with_test_edges() {
        let (_, graph) = graph_of(&trees::library_with_test());

        assert!(graph.edges("lib_a").is_empty());
        assert_eq!(graph.edges("lib_b"), ["lib_a"]);
        assert_eq!(graph.edges("lib_b_test"), ["lib_a", "lib_b"]);
    }

    #[test]
    fn test_no_transitive_closure() {
        let tree = TreeFixture::new();
        tree.source("a", "a.cpp")
            .manifest("a", "DEPENDS := b\n")
            .source("b", "b.cpp")
            .manifest("b", "DEPENDS := c\n")
            .source("c", "c.cpp");
        let (_, graph) = graph_of(&tree);

        assert_eq!(graph.edges("a"), ["b"]);
        assert_eq!(graph.edges("b"), ["c"]);
    }

    #[test]
    fn test_order_duplicates_and_unknown_names_kept() {
        let tree = TreeFixture::new();
        tree.source("util", "u.cpp")
            .source("core", "c.cpp")
            .manifest("core", "DEPENDS := boost util boost util\n");
        let (_, graph) = graph_of(&tree);

        assert_eq!(graph.edges("core"), ["boost", "util", "boost", "util"]);
        assert_eq!(
            graph.unresolved(),
            vec![("core", "boost"), ("core", "boost")]
        );
    }

    #[test]
    fn test_runnable_uses_owner_dependencies_only() {
        let tree = TreeFixture::new();
        tree.source("common", "c.cpp")
            .source("extra", "e.cpp")
            .source("main", "main.cpp")
            .manifest("main", "EXE := app\nDEPENDS := common\n")
            .source("main/test", "t.cpp")
            .manifest("main/test", "DEPENDS := extra\n");
        let (_, graph) = graph_of(&tree);

        assert_eq!(graph.edges("main_test"), ["common", "app"]);
    }

    #[test]
    fn test_lookup_fallbacks() {
        let tree = TreeFixture::new();
        tree.source("lib/a", "a.cpp")
            .source("lib/b", "b.cpp")
            .source("apps/tool", "t.cpp")
            .manifest("apps/tool", "EXE := tool\n");
        let (set, _) = graph_of(&tree);

        assert_eq!(lookup(&set, "lib/b", "lib_a").unwrap().name(), "lib_a");
        assert_eq!(lookup(&set, "lib/b", "a").unwrap().name(), "lib_a");
        assert_eq!(lookup(&set, "apps/tool", "lib/b").unwrap().name(), "lib_b");
        assert_eq!(lookup(&set, "lib/b", "tool").unwrap().name(), "tool");
        assert!(lookup(&set, "apps/tool", "a").is_none());
    }

    #[test]
    fn test_build_order_dependencies_first() {
        let (_, graph) = graph_of(&trees::application());
        let order = graph.build_order().unwrap();

        assert_eq!(order.len(), graph.len());
        assert!(position(&order, "common") < position(&order, "interp"));
        assert!(position(&order, "interp") < position(&order, "prologcoin"));
        assert!(position(&order, "prologcoin") < position(&order, "main_test"));
    }

    #[test]
    fn test_cycle_reported() {
        let tree = TreeFixture::new();
        tree.source("a", "a.cpp")
            .manifest("a", "DEPENDS := b\n")
            .source("b", "b.cpp")
            .manifest("b", "DEPENDS := a\n");
        let (_, graph) = graph_of(&tree);

        let cycle = graph.build_order().unwrap_err();
        assert!(cycle.target == "a" || cycle.target == "b");
    }
}
