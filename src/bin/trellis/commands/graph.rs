//! `trellis graph` command

use anyhow::{bail, Result};

use crate::cli::GraphArgs;
use trellis::core::Workspace;
use trellis::ops::resolve_workspace;
use trellis::resolver::DepGraph;
use trellis::util::diagnostic::{emit, Diagnostic};

pub fn execute(args: GraphArgs, ws: &Workspace) -> Result<()> {
    let (targets, graph) = resolve_workspace(ws)?;

    if let Some(name) = &args.target {
        if !targets.contains(name) {
            bail!(
                "unknown target `{}`\n\
                 hint: use `trellis scan` to list all targets",
                name
            );
        }
    }

    if args.order {
        return print_order(&graph);
    }

    for target in &targets {
        if args.target.as_deref().is_some_and(|t| t != target.name()) {
            continue;
        }
        println!("{} ({})", target.name(), target.kind());
        print_edges(&graph, target.name(), |dep| targets.contains(dep));
    }
    Ok(())
}

fn print_edges(graph: &DepGraph, name: &str, known: impl Fn(&str) -> bool) {
    let deps = graph.edges(name);
    for (i, dep) in deps.iter().enumerate() {
        let branch = if i + 1 == deps.len() { "└──" } else { "├──" };
        let marker = if known(dep) { "" } else { " (unresolved)" };
        println!("{} {}{}", branch, dep, marker);
    }
}

fn print_order(graph: &DepGraph) -> Result<()> {
    match graph.build_order() {
        Ok(order) => {
            for (i, name) in order.iter().enumerate() {
                println!("{:>3}. {}", i + 1, name);
            }
        }
        Err(cycle) => emit(
            &Diagnostic::warning(cycle.to_string())
                .with_context("targets on a cycle have no dependencies-first order")
                .with_suggestion("Remove one of the `DEPENDS` entries on the cycle"),
            false,
        ),
    }
    Ok(())
}
