//! `trellis generate` command

use anyhow::Result;

use crate::cli::GenerateArgs;
use trellis::core::Workspace;
use trellis::ops::generate;
use trellis::util::fs::write_string;

pub fn execute(args: GenerateArgs, ws: &Workspace) -> Result<()> {
    let generation = generate(ws)?;

    let mut json = if args.compact {
        serde_json::to_string(&generation)?
    } else {
        serde_json::to_string_pretty(&generation)?
    };
    json.push('\n');

    match &args.output {
        Some(path) => {
            write_string(path, &json)?;
            tracing::info!("wrote {}", path.display());
        }
        None => print!("{}", json),
    }
    Ok(())
}
