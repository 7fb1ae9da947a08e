//! Command implementations

pub mod generate;
pub mod graph;
pub mod scan;

use anyhow::{Context, Result};

use crate::cli::Cli;
use trellis::core::{find_root, Workspace};

/// Open the workspace selected by the global flags.
///
/// Without `--root`, the nearest ancestor of the current directory holding
/// `trellis.toml` is used, falling back to the current directory itself.
pub fn load_workspace(cli: &Cli) -> Result<Workspace> {
    let root = match &cli.root {
        Some(root) => root.clone(),
        None => {
            let cwd = std::env::current_dir().context("failed to read current directory")?;
            find_root(&cwd).unwrap_or(cwd)
        }
    };
    tracing::debug!("project root: {}", root.display());

    let ws = Workspace::open(&root, cli.config.as_deref())?;
    Ok(ws)
}
