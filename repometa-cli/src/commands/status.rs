//! `repometa status`: cache freshness per repository.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use repometa_core::{store, RecordStore, SiteLayout};
use repometa_sync::{should_refresh_at, Staleness};

/// Arguments for `repometa status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl StatusArgs {
    pub fn run(self, layout: &SiteLayout) -> Result<()> {
        let records = store::load_or_empty_at(&layout.repos_file())
            .context("failed to load repositories")?;

        let report = build_report(&records);
        if self.json {
            print_json(report)?;
            return Ok(());
        }

        print_table(report);
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct RepoStatus {
    repo: String,
    name: Option<String>,
    stars: Option<u64>,
    last_updated: Option<String>,
    decision: Staleness,
}

#[derive(Serialize)]
struct StatusReportJson {
    summary: StatusSummaryJson,
    repos: Vec<RepoStatusJson>,
}

#[derive(Serialize)]
struct StatusSummaryJson {
    repos: usize,
    stale: usize,
}

#[derive(Serialize)]
struct RepoStatusJson {
    repo: String,
    name: Option<String>,
    stars: Option<u64>,
    last_updated: Option<String>,
    status: &'static str,
    detail: String,
}

#[derive(Tabled)]
struct StatusTableRow {
    #[tabled(rename = "repository")]
    repo: String,
    #[tabled(rename = "status")]
    status: String,
    #[tabled(rename = "detail")]
    detail: String,
    #[tabled(rename = "stars")]
    stars: String,
}

fn build_report(records: &RecordStore) -> Vec<RepoStatus> {
    let now = Utc::now();
    records
        .iter()
        .map(|record| RepoStatus {
            repo: record.repo.to_string(),
            name: record.name.clone(),
            stars: record.stars,
            last_updated: record.last_updated.clone(),
            decision: should_refresh_at(Some(record), false, now),
        })
        .collect()
}

fn stale_count(rows: &[RepoStatus]) -> usize {
    rows.iter().filter(|r| r.decision.needs_refresh()).count()
}

fn print_json(rows: Vec<RepoStatus>) -> Result<()> {
    let payload = StatusReportJson {
        summary: StatusSummaryJson {
            repos: rows.len(),
            stale: stale_count(&rows),
        },
        repos: rows
            .into_iter()
            .map(|row| RepoStatusJson {
                status: decision_key(&row.decision),
                detail: row.decision.to_string(),
                repo: row.repo,
                name: row.name,
                stars: row.stars,
                last_updated: row.last_updated,
            })
            .collect(),
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize status JSON")?
    );
    Ok(())
}

fn print_table(rows: Vec<RepoStatus>) {
    println!(
        "repometa v{} | {} repositories | {} stale",
        env!("CARGO_PKG_VERSION"),
        rows.len(),
        stale_count(&rows),
    );

    if rows.is_empty() {
        println!("No repositories cached. Run 'repometa fetch' first.");
        return;
    }

    let needs_fetch = stale_count(&rows) > 0;
    let table_rows: Vec<StatusTableRow> = rows
        .into_iter()
        .map(|row| StatusTableRow {
            status: format!("{} {}", decision_indicator(&row.decision), decision_label(&row.decision)),
            detail: row.decision.to_string(),
            stars: row.stars.map(|s| s.to_string()).unwrap_or_else(|| "-".to_owned()),
            repo: row.repo,
        })
        .collect();
    let mut table = Table::new(table_rows);
    table.with(Style::rounded());
    println!("{table}");

    if needs_fetch {
        println!("Run 'repometa fetch' to refresh stale repositories.");
    }
}

fn decision_key(decision: &Staleness) -> &'static str {
    match decision {
        Staleness::Fresh { .. } => "fresh",
        Staleness::Stale { .. } => "stale",
        Staleness::NoTimestamp => "no_timestamp",
        Staleness::InvalidTimestamp => "invalid_timestamp",
        Staleness::New | Staleness::Forced => "pending",
    }
}

fn decision_label(decision: &Staleness) -> &'static str {
    match decision {
        Staleness::Fresh { .. } => "FRESH",
        Staleness::Stale { .. } => "STALE",
        Staleness::NoTimestamp | Staleness::InvalidTimestamp => "UNKNOWN",
        Staleness::New | Staleness::Forced => "PENDING",
    }
}

fn decision_indicator(decision: &Staleness) -> String {
    match decision {
        Staleness::Fresh { .. } => "■".green().bold().to_string(),
        Staleness::Stale { .. } => "■".yellow().bold().to_string(),
        Staleness::NoTimestamp | Staleness::InvalidTimestamp => "■".red().bold().to_string(),
        Staleness::New | Staleness::Forced => "■".bright_black().bold().to_string(),
    }
}
