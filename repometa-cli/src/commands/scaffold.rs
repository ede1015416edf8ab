//! `repometa scaffold`: create stub software pages.

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use repometa_core::{store, SiteLayout};
use repometa_sync::scaffold::DEFAULT_MINIMAL_STARS;
use repometa_sync::{scaffold_all, ScaffoldOptions, ScaffoldOutcome, ScaffoldStatus};

/// Arguments for `repometa scaffold`.
#[derive(Args, Debug)]
pub struct ScaffoldArgs {
    /// Show what would be created without creating anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Minimum stars a repository needs to get a page.
    #[arg(long, default_value_t = DEFAULT_MINIMAL_STARS)]
    pub minimal_stars: u64,
}

#[derive(Tabled)]
struct ScaffoldRow {
    #[tabled(rename = "repository")]
    repo: String,
    #[tabled(rename = "status")]
    status: String,
    #[tabled(rename = "message")]
    message: String,
    #[tabled(rename = "directory")]
    directory: String,
}

impl ScaffoldArgs {
    pub fn run(self, layout: &SiteLayout) -> Result<()> {
        if self.dry_run {
            println!("{}", "DRY RUN MODE - no files will be created".yellow());
        }
        let records = store::load_at(&layout.repos_file()).context("cannot load repositories")?;
        let options = ScaffoldOptions {
            dry_run: self.dry_run,
            minimal_stars: self.minimal_stars,
        };
        let outcomes = scaffold_all(&layout.software_dir(), &records, options)
            .context("scaffold failed")?;

        print_table(&outcomes);
        let count = |status| outcomes.iter().filter(|o| o.status == status).count();
        let errors = count(ScaffoldStatus::Error);
        println!(
            "{} created, {} skipped, {} errors",
            count(ScaffoldStatus::Created),
            count(ScaffoldStatus::Skipped),
            errors
        );
        if errors > 0 {
            bail!("{errors} software page(s) could not be created");
        }
        Ok(())
    }
}

fn status_label(status: ScaffoldStatus) -> String {
    match status {
        ScaffoldStatus::Created => "created".green().to_string(),
        ScaffoldStatus::Skipped => "skipped".bright_black().to_string(),
        ScaffoldStatus::Error => "error".red().to_string(),
    }
}

fn print_table(outcomes: &[ScaffoldOutcome]) {
    if outcomes.is_empty() {
        println!("No repositories cached.");
        return;
    }
    let rows: Vec<ScaffoldRow> = outcomes
        .iter()
        .map(|o| ScaffoldRow {
            repo: o.repo.to_string(),
            status: status_label(o.status),
            message: o.message.clone(),
            directory: o.software.clone().unwrap_or_else(|| "-".to_owned()),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}
