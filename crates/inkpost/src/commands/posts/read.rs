//! `inkpost posts list` and `inkpost posts show`.

use std::fmt::Write as _;

use clap::Args;
use inkpost_markdown::render_markdown;
use inkpost_store::{Post, PostStore, format_date};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the list command.
#[derive(Args)]
pub(super) struct ListArgs {
    /// Include unpublished drafts.
    #[arg(long)]
    drafts: bool,
}

impl ListArgs {
    pub(super) fn execute(self, store: &dyn PostStore, output: &Output) -> Result<(), CliError> {
        let posts = store.list(self.drafts)?;
        if posts.is_empty() {
            output.warning("No posts found.");
            return Ok(());
        }
        for post in &posts {
            output.document(&listing_line(post))?;
        }
        Ok(())
    }
}

/// Arguments for the show command.
#[derive(Args)]
pub(super) struct ShowArgs {
    /// Post ID.
    id: String,

    /// Print the body rendered as HTML.
    #[arg(long)]
    html: bool,
}

impl ShowArgs {
    pub(super) fn execute(self, store: &dyn PostStore, output: &Output) -> Result<(), CliError> {
        let post = store
            .get(&self.id)?
            .ok_or_else(|| CliError::NotFound(self.id.clone()))?;
        output.document(&show_text(&post, self.html))?;
        Ok(())
    }
}

/// Display date, falling back to the stored value when it does not parse.
fn display_date(post: &Post) -> String {
    format_date(&post.date).unwrap_or_else(|| post.date.clone())
}

/// One listing row: id, date, draft marker, title.
fn listing_line(post: &Post) -> String {
    let marker = if post.is_draft() { "[draft] " } else { "" };
    format!("{}\t{}\t{marker}{}", post.id, display_date(post), post.title)
}

fn show_text(post: &Post, html: bool) -> String {
    let mut text = String::new();
    writeln!(text, "{}", post.title).unwrap();
    write!(text, "{}", display_date(post)).unwrap();
    if post.is_draft() {
        text.push_str(" (draft)");
    }
    text.push_str("\n\n");
    if html {
        text.push_str(&render_markdown(&post.body));
    } else {
        text.push_str(&post.body);
    }
    text
}
