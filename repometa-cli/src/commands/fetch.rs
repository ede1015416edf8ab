//! `repometa fetch`: refresh the record store from GitHub.

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use repometa_core::layout::load_orgs;
use repometa_core::{store, SiteLayout};
use repometa_github::{GithubClient, RepoSource};
use repometa_sync::{refresh_all, FieldSelection, OrgOutcome, ReconcileOptions};

const SKIPPED_SHOWN: usize = 5;

/// Arguments for `repometa fetch`.
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Comma-separated fields to update, or `basic` for the fields that need
    /// no extra API calls. All fields when omitted.
    #[arg(long)]
    pub keys: Option<String>,

    /// Refresh every repository, ignoring `last_updated`.
    #[arg(long, short)]
    pub force: bool,
}

impl FetchArgs {
    pub fn run(self, layout: &SiteLayout) -> Result<()> {
        let orgs = load_orgs(&layout.orgs_file()).context("cannot read organizations")?;
        println!("{} {}", "Organizations:".cyan(), orgs.join(", "));

        let selection = match self.keys.as_deref() {
            Some(keys) => {
                let (selection, _) = FieldSelection::parse(keys);
                println!(
                    "{} {}",
                    "Updating keys:".cyan(),
                    selection
                        .fields()
                        .iter()
                        .map(|f| f.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
                selection
            }
            None => FieldSelection::All,
        };
        if self.force {
            println!("{} ignoring last_updated timestamps", "Force mode:".yellow());
        }

        let repos_file = layout.repos_file();
        let mut records = store::load_or_empty_at(&repos_file)
            .with_context(|| format!("refusing to overwrite unreadable {}", repos_file.display()))?;
        tracing::info!("loaded {} cached repositories", records.len());

        load_dotenv(layout.root());
        let client = GithubClient::from_env()?;
        log_rate_limit(&client);

        let options = ReconcileOptions {
            selection,
            force: self.force,
        };
        let outcomes = refresh_all(&client, &mut records, &repos_file, &orgs, &options);
        for outcome in &outcomes {
            print_outcome(outcome);
        }

        log_rate_limit(&client);

        let failed: usize = outcomes.iter().map(|o| o.errors.len()).sum();
        if failed > 0 {
            bail!("{failed} repository write(s) failed");
        }
        println!("{}", "✓ Done".green().bold());
        Ok(())
    }
}

/// Read `<root>/.env` into the environment. Variables already set win.
fn load_dotenv(root: &Path) {
    let path = root.join(".env");
    match dotenvy::from_path(&path) {
        Ok(()) => tracing::debug!("loaded {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("ignoring {}: {e}", path.display()),
    }
}

fn log_rate_limit(client: &impl RepoSource) {
    match client.rate_limit() {
        Ok(rate) => tracing::info!(
            "rate limit: {}/{} remaining (resets at {})",
            rate.remaining,
            rate.limit,
            rate.reset.format("%H:%M:%S")
        ),
        Err(e) => tracing::warn!("could not read rate limit: {e}"),
    }
}

fn print_outcome(outcome: &OrgOutcome) {
    println!();
    println!("{} {}", "Organization:".cyan().bold(), outcome.org);
    if let Some(err) = &outcome.list_error {
        println!("  {} could not list repositories: {err}", "✗".red());
        return;
    }
    println!(
        "  {} {} repos: {} updated, {} skipped",
        "✓".green(),
        outcome.listed,
        outcome.updated.len(),
        outcome.skipped.len()
    );

    for skipped in outcome.skipped.iter().take(SKIPPED_SHOWN) {
        println!("  {}", format!("• {} ({})", skipped.repo, skipped.reason).bright_black());
    }
    if outcome.skipped.len() > SKIPPED_SHOWN {
        println!(
            "  {}",
            format!("• ... and {} more", outcome.skipped.len() - SKIPPED_SHOWN).bright_black()
        );
    }
    for failure in &outcome.field_failures {
        println!(
            "  {} {} {}: {}",
            "!".yellow(),
            failure.repo,
            failure.field,
            failure.message
        );
    }
    for error in &outcome.errors {
        println!("  {} {}: {}", "✗".red(), error.repo, error.message);
    }
}
