//! `repometa diff`: show unified diffs for what `frontmatter` would write.

use anyhow::{Context, Result};
use clap::Args;

use repometa_core::SiteLayout;
use repometa_sync::{diff_documents, ProjectInputs};

/// Arguments for `repometa diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {}

impl DiffArgs {
    pub fn run(self, layout: &SiteLayout) -> Result<()> {
        let inputs = ProjectInputs::load(layout).context("cannot load site data")?;
        let diffs = diff_documents(&inputs, layout.root()).context("diff failed")?;

        if diffs.is_empty() {
            println!("No differences.");
            return Ok(());
        }

        for diff in diffs {
            print!("{}", diff.unified_diff);
            if !diff.unified_diff.ends_with('\n') {
                println!();
            }
        }

        Ok(())
    }
}
