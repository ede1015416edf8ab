//! repometa: GitHub metadata cache and front-matter projector for a static site.
//!
//! # Usage
//!
//! ```text
//! repometa [--root <dir>] fetch [--keys <list|basic>] [--force]
//! repometa [--root <dir>] frontmatter
//! repometa [--root <dir>] diff
//! repometa [--root <dir>] scaffold [--dry-run] [--minimal-stars N]
//! repometa [--root <dir>] status [--json]
//! ```

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    diff::DiffArgs, fetch::FetchArgs, frontmatter::FrontmatterArgs, scaffold::ScaffoldArgs,
    status::StatusArgs,
};
use repometa_core::SiteLayout;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "repometa",
    version,
    about = "Cache GitHub repository metadata and project it into site front-matter",
    long_about = None,
)]
struct Cli {
    /// Site root containing `data/` and `content/`.
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Refresh cached metadata for every repository of the configured organizations.
    Fetch(FetchArgs),

    /// Write cached metadata into `content/software/*/_index.md` front-matter.
    Frontmatter(FrontmatterArgs),

    /// Show unified diff of what `frontmatter` would write.
    Diff(DiffArgs),

    /// Create software pages for popular cached repositories.
    Scaffold(ScaffoldArgs),

    /// Show cache freshness for every cached repository.
    Status(StatusArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let layout = SiteLayout::new(cli.root);
    match cli.command {
        Commands::Fetch(args) => args.run(&layout),
        Commands::Frontmatter(args) => args.run(&layout),
        Commands::Diff(args) => args.run(&layout),
        Commands::Scaffold(args) => args.run(&layout),
        Commands::Status(args) => args.run(&layout),
    }
}
