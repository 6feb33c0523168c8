//! `inkpost posts new`, `edit` and `delete`.

use std::path::PathBuf;

use clap::Args;
use inkpost_store::{NewPost, PostPatch, PostStore};

use crate::commands::read_input;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the new command.
#[derive(Args)]
pub(super) struct NewArgs {
    /// Post title.
    #[arg(short, long)]
    title: String,

    /// Markdown file with the post body (default: read stdin).
    #[arg(short, long)]
    body_file: Option<PathBuf>,

    /// Publish immediately instead of saving a draft.
    #[arg(long)]
    publish: bool,
}

impl NewArgs {
    pub(super) fn execute(self, store: &dyn PostStore, output: &Output) -> Result<(), CliError> {
        if self.title.trim().is_empty() {
            return Err(CliError::Validation("Post title cannot be empty".to_owned()));
        }
        let body = read_input(self.body_file.as_deref())?;

        let post = store.create(NewPost::new(self.title, body).published(self.publish))?;

        output.success(&format!("Created post {}", post.id));
        output.info(&format!("Title: {}", post.title));
        output.info(&format!("Status: {}", status(post.published)));
        Ok(())
    }
}

/// Arguments for the edit command.
#[derive(Args)]
pub(super) struct EditArgs {
    /// Post ID.
    id: String,

    /// New title.
    #[arg(short, long)]
    title: Option<String>,

    /// Markdown file with the new body.
    #[arg(short, long)]
    body_file: Option<PathBuf>,

    /// Mark the post as published.
    #[arg(long)]
    publish: bool,

    /// Mark the post as a draft.
    #[arg(long, conflicts_with = "publish")]
    draft: bool,
}

impl EditArgs {
    pub(super) fn execute(self, store: &dyn PostStore, output: &Output) -> Result<(), CliError> {
        let patch = self.patch()?;
        if patch.is_empty() {
            return Err(CliError::Validation(
                "Nothing to change: pass --title, --body-file, --publish or --draft".to_owned(),
            ));
        }

        let post = store
            .update(&self.id, patch)?
            .ok_or_else(|| CliError::NotFound(self.id.clone()))?;

        output.success(&format!("Updated post {}", post.id));
        output.info(&format!("Title: {}", post.title));
        output.info(&format!("Status: {}", status(post.published)));
        Ok(())
    }

    fn patch(&self) -> Result<PostPatch, CliError> {
        let body = match &self.body_file {
            Some(path) => Some(std::fs::read_to_string(path)?),
            None => None,
        };
        let published = if self.publish {
            Some(true)
        } else if self.draft {
            Some(false)
        } else {
            None
        };
        Ok(PostPatch {
            title: self.title.clone(),
            body,
            published,
            ..Default::default()
        })
    }
}

/// Arguments for the delete command.
#[derive(Args)]
pub(super) struct DeleteArgs {
    /// Post ID.
    id: String,
}

impl DeleteArgs {
    pub(super) fn execute(self, store: &dyn PostStore, output: &Output) -> Result<(), CliError> {
        if store.get(&self.id)?.is_none() {
            output.warning(&format!("Post {} not found, nothing deleted", self.id));
            return Ok(());
        }
        store.delete(&self.id)?;
        output.success(&format!("Deleted post {}", self.id));
        Ok(())
    }
}

fn status(published: bool) -> &'static str {
    if published { "published" } else { "draft" }
}
