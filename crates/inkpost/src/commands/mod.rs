//! CLI command implementations.

pub(crate) mod excerpt;
pub(crate) mod posts;
pub(crate) mod render;

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Args;

use crate::error::CliError;

pub(crate) use excerpt::ExcerptArgs;
pub(crate) use posts::PostsArgs;
pub(crate) use render::RenderArgs;

/// Options shared by every command.
#[derive(Args)]
pub(crate) struct GlobalArgs {
    /// Path to configuration file (default: auto-discover inkpost.toml).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output (store and HTTP logs).
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Read a whole document from `path`, or from stdin when no path is given.
pub(crate) fn read_input(path: Option<&Path>) -> Result<String, CliError> {
    if let Some(path) = path {
        return Ok(std::fs::read_to_string(path)?);
    }
    let mut text = String::new();
    std::io::stdin().read_to_string(&mut text)?;
    Ok(text)
}
