//! `inkpost posts` command implementations.

mod read;
mod write;

use std::path::PathBuf;

use clap::{Args, Subcommand};
use inkpost_config::{CliSettings, Config, StoreBackend};
use inkpost_store::PostStore;
use inkpost_store_local::LocalStore;
use inkpost_store_rest::{DEFAULT_TIMEOUT, RestStore};

use super::GlobalArgs;
use crate::error::CliError;
use crate::output::Output;

use read::{ListArgs, ShowArgs};
use write::{DeleteArgs, EditArgs, NewArgs};

/// Arguments for the posts command group.
#[derive(Args)]
pub(crate) struct PostsArgs {
    /// Storage backend: local or rest (overrides config).
    #[arg(long, global = true)]
    backend: Option<StoreBackend>,

    /// Local store file (overrides config).
    #[arg(long, global = true)]
    store_path: Option<PathBuf>,

    #[command(subcommand)]
    command: PostsCommand,
}

#[derive(Subcommand)]
enum PostsCommand {
    /// List posts, newest first.
    List(ListArgs),
    /// Show a single post.
    Show(ShowArgs),
    /// Create a post.
    New(NewArgs),
    /// Change a post's title, body or status.
    Edit(EditArgs),
    /// Delete a post.
    Delete(DeleteArgs),
}

impl PostsArgs {
    /// Execute a posts subcommand against the configured store.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the store operation fails.
    pub(crate) fn execute(self, global: &GlobalArgs) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            backend: self.backend,
            local_path: self.store_path,
            ..Default::default()
        };
        let config = Config::load(global.config.as_deref(), Some(&cli_settings))?;
        let store = open_store(&config)?;
        let output = Output::new();

        match self.command {
            PostsCommand::List(args) => args.execute(store.as_ref(), &output),
            PostsCommand::Show(args) => args.execute(store.as_ref(), &output),
            PostsCommand::New(args) => args.execute(store.as_ref(), &output),
            PostsCommand::Edit(args) => args.execute(store.as_ref(), &output),
            PostsCommand::Delete(args) => args.execute(store.as_ref(), &output),
        }
    }
}

/// Build the post store selected by configuration.
fn open_store(config: &Config) -> Result<Box<dyn PostStore>, CliError> {
    match config.store.backend {
        StoreBackend::Local => {
            let store = LocalStore::new(config.local_resolved.path.clone());
            tracing::info!(path = %store.path().display(), "Using local post store");
            Ok(Box::new(store))
        }
        StoreBackend::Rest => {
            let rest = config.require_rest()?;
            tracing::info!(base_url = %rest.base_url, table = %rest.table, "Using REST post store");
            Ok(Box::new(RestStore::with_options(
                &rest.base_url,
                &rest.api_key,
                &rest.table,
                DEFAULT_TIMEOUT,
            )))
        }
    }
}
