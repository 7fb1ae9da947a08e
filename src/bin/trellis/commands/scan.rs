//! `trellis scan` command

use anyhow::Result;

use crate::cli::ScanArgs;
use trellis::core::Workspace;
use trellis::ops::scan_workspace;

pub fn execute(args: ScanArgs, ws: &Workspace) -> Result<()> {
    let targets = scan_workspace(ws)?;

    if args.json {
        let list: Vec<_> = targets.iter().collect();
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    let width = targets.iter().map(|t| t.name().len()).max().unwrap_or(0);
    for target in &targets {
        let dir = if target.relative_dir().is_empty() {
            "."
        } else {
            target.relative_dir()
        };
        println!(
            "{:<width$}  {:<10} {}  {}",
            target.name(),
            target.kind(),
            target.id(),
            dir,
            width = width
        );
    }
    Ok(())
}
