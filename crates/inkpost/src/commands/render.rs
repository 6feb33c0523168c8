//! `inkpost render` command implementation.

use std::path::PathBuf;

use clap::Args;
use inkpost_markdown::render_markdown;

use super::read_input;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown file to render (default: read stdin).
    file: Option<PathBuf>,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be read or stdout cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let markdown = read_input(self.file.as_deref())?;
        tracing::info!(bytes = markdown.len(), "Rendering document");
        Output::new().document(&render_markdown(&markdown))?;
        Ok(())
    }
}
