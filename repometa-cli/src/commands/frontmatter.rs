//! `repometa frontmatter`: project cached records into software pages.

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use repometa_core::SiteLayout;
use repometa_sync::{project_all, ProjectInputs};

/// Arguments for `repometa frontmatter`.
#[derive(Args, Debug)]
pub struct FrontmatterArgs {}

impl FrontmatterArgs {
    pub fn run(self, layout: &SiteLayout) -> Result<()> {
        let inputs = ProjectInputs::load(layout).context("cannot load site data")?;
        let summary = project_all(&inputs).context("front-matter update failed")?;

        println!("{}", "Summary:".bold());
        println!("  {} Updated:  {}", "✓".green(), summary.updated.len());
        println!("  {} Skipped:  {}", "○".bright_black(), summary.skipped.len());
        if !summary.errors.is_empty() {
            println!("  {} Errors:   {}", "✗".red(), summary.errors.len());
            for (path, message) in &summary.errors {
                println!("    {}: {message}", path.display());
            }
            bail!("{} document(s) could not be updated", summary.errors.len());
        }
        Ok(())
    }
}
