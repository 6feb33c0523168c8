//! `inkpost excerpt` command implementation.

use std::path::PathBuf;

use clap::Args;
use inkpost_config::{CliSettings, Config};
use inkpost_markdown::excerpt;

use super::{GlobalArgs, read_input};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the excerpt command.
#[derive(Args)]
pub(crate) struct ExcerptArgs {
    /// Markdown file to summarize (default: read stdin).
    file: Option<PathBuf>,

    /// Maximum excerpt length in characters (overrides config).
    #[arg(short, long)]
    max_len: Option<usize>,
}

impl ExcerptArgs {
    /// Execute the excerpt command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the input cannot be read.
    pub(crate) fn execute(self, global: &GlobalArgs) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            excerpt_length: self.max_len,
            ..Default::default()
        };
        let config = Config::load(global.config.as_deref(), Some(&cli_settings))?;

        let markdown = read_input(self.file.as_deref())?;
        Output::new().document(&excerpt(&markdown, config.render.excerpt_length))?;
        Ok(())
    }
}
