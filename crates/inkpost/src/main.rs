//! inkpost CLI - Markdown blog engine.
//!
//! Provides commands for:
//! - `render`: Render Markdown to HTML
//! - `excerpt`: Print the plain-text excerpt of a Markdown document
//! - `posts`: List, show, create, edit and delete stored posts

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ExcerptArgs, GlobalArgs, PostsArgs, RenderArgs};
use output::Output;

/// inkpost - Markdown blog engine.
#[derive(Parser)]
#[command(name = "inkpost", version, about)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render Markdown to HTML.
    Render(RenderArgs),
    /// Print the plain-text excerpt of a Markdown document.
    Excerpt(ExcerptArgs),
    /// Manage stored posts.
    Posts(PostsArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.global.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(),
        Commands::Excerpt(args) => args.execute(&cli.global),
        Commands::Posts(args) => args.execute(&cli.global),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        if let Some(hint) = err.retry_hint() {
            output.warning(hint);
        }
        std::process::exit(1);
    }
}
