//! Trellis CLI - solution generator for C and C++ source trees

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use trellis::util::diagnostic::emit;
use trellis::ConfigError;

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color && std::io::stderr().is_terminal();

    if let Err(e) = run(cli) {
        match e.downcast_ref::<ConfigError>() {
            Some(config_error) => emit(&config_error.to_diagnostic(), color),
            None => eprintln!("error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("trellis=debug")
    } else {
        EnvFilter::new("trellis=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let ws = commands::load_workspace(&cli)?;

    // Execute command
    match cli.command {
        Commands::Scan(args) => commands::scan::execute(args, &ws),
        Commands::Graph(args) => commands::graph::execute(args, &ws),
        Commands::Generate(args) => commands::generate::execute(args, &ws),
    }
}
