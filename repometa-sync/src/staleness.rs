//! Refresh decision for cached records.
//!
//! Precedence:
//! 1. `New` (no cached record)
//! 2. `Forced`
//! 3. `NoTimestamp` (`last_updated` absent or empty)
//! 4. `InvalidTimestamp` (not RFC 3339 with an offset)
//! 5. `Stale` (at least [`REFRESH_INTERVAL_HOURS`] old)
//! 6. `Fresh`

use std::fmt;

use chrono::{DateTime, Utc};

use repometa_core::RepoRecord;

/// Records younger than this are left alone.
pub const REFRESH_INTERVAL_HOURS: i64 = 12;

/// Why a record is, or is not, refreshed.
#[derive(Debug, Clone, PartialEq)]
pub enum Staleness {
    New,
    Forced,
    NoTimestamp,
    InvalidTimestamp,
    Stale { hours: f64 },
    Fresh { hours: f64 },
}

impl Staleness {
    pub fn needs_refresh(&self) -> bool {
        !matches!(self, Staleness::Fresh { .. })
    }
}

impl fmt::Display for Staleness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Staleness::New => f.write_str("new repo"),
            Staleness::Forced => f.write_str("forced"),
            Staleness::NoTimestamp => f.write_str("no timestamp"),
            Staleness::InvalidTimestamp => f.write_str("invalid timestamp"),
            Staleness::Stale { hours } => write!(f, "stale ({hours:.1}h ago)"),
            Staleness::Fresh { hours } => write!(f, "updated {hours:.1}h ago"),
        }
    }
}

/// Classify `existing` relative to `now`.
pub fn should_refresh_at(
    existing: Option<&RepoRecord>,
    force: bool,
    now: DateTime<Utc>,
) -> Staleness {
    let Some(record) = existing else {
        return Staleness::New;
    };
    if force {
        return Staleness::Forced;
    }
    let raw = match record.last_updated.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Staleness::NoTimestamp,
    };
    let Ok(last) = DateTime::parse_from_rfc3339(raw) else {
        return Staleness::InvalidTimestamp;
    };

    let elapsed = now.signed_duration_since(last.with_timezone(&Utc));
    let hours = elapsed.num_milliseconds() as f64 / 3_600_000.0;
    if elapsed >= chrono::Duration::hours(REFRESH_INTERVAL_HOURS) {
        Staleness::Stale { hours }
    } else {
        Staleness::Fresh { hours }
    }
}

/// [`should_refresh_at`] against the current clock.
pub fn should_refresh(existing: Option<&RepoRecord>, force: bool) -> Staleness {
    should_refresh_at(existing, force, Utc::now())
}
