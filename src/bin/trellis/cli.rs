//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Trellis - solution generator for C and C++ source trees
#[derive(Parser)]
#[command(name = "trellis")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Project root (defaults to the nearest directory holding trellis.toml)
    #[arg(long, global = true, env = "TRELLIS_ROOT")]
    pub root: Option<PathBuf>,

    /// Configuration file to use instead of <root>/trellis.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the targets found in the source tree
    Scan(ScanArgs),

    /// Display the direct dependencies of every target
    Graph(GraphArgs),

    /// Assemble the solution and its project descriptors
    Generate(GenerateArgs),
}

#[derive(Args)]
pub struct ScanArgs {
    /// Print targets as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct GraphArgs {
    /// Only show this target
    pub target: Option<String>,

    /// Print a dependencies-first build order instead of the edge lists
    #[arg(long)]
    pub order: bool,
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Emit compact JSON
    #[arg(long)]
    pub compact: bool,
}
