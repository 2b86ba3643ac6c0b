//! Init-config command - write the default configuration as JSON

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;

use chessview_game::GameConfig;

#[derive(Args)]
pub struct InitConfigArgs {
    /// Where to write the configuration
    #[arg(default_value = "chessview.json")]
    pub path: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitConfigArgs) -> Result<()> {
    write_default(&args.path, args.force)?;
    println!("Wrote default configuration to {}", args.path.display());
    Ok(())
}

fn write_default(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    GameConfig::default()
        .save(path)
        .with_context(|| format!("failed to write {}", path.display()))
}
