pub mod activity;
pub mod prune;
pub mod record;
pub mod tick;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

/// Resolve an optional RFC 3339 `--at` override, defaulting to now.
///
/// Every subcommand takes `--at` so behavior around UTC day boundaries can
/// be exercised deterministically.
pub fn resolve_now(at: Option<&str>) -> Result<DateTime<Utc>> {
    match at {
        None => Ok(Utc::now()),
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .with_context(|| format!("invalid --at timestamp {raw:?} (expected RFC 3339)")),
    }
}
