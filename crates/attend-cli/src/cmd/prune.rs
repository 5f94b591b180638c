//! `att prune` — force a retention prune, bypassing the once-per-day gate.

use std::io::Write;

use anyhow::Result;
use attend_core::TrackerConfig;
use attend_core::host::ActivityService;
use clap::Args;
use serde::Serialize;

use crate::cmd::resolve_now;
use crate::output::{OutputMode, render};

/// Arguments for `att prune`.
#[derive(Args, Debug)]
pub struct PruneArgs {
    /// Evaluate the retention cutoff at this instant, RFC 3339; defaults to now.
    #[arg(long)]
    pub at: Option<String>,
}

/// Report payload for `att prune`.
#[derive(Debug, Serialize)]
struct PruneReport {
    retention_months: u32,
    enabled: bool,
    dates_removed: usize,
    players_removed: usize,
    players: usize,
}

/// Execute `att prune`.
pub fn run_prune(args: &PruneArgs, config: &TrackerConfig, output: OutputMode) -> Result<()> {
    let now = resolve_now(args.at.as_deref())?;
    let mut service = ActivityService::start(config.clone());

    let stats = service.force_prune(now);
    let report = PruneReport {
        retention_months: config.data_retention_months,
        enabled: config.is_enabled,
        dates_removed: stats.map_or(0, |s| s.dates_removed),
        players_removed: stats.map_or(0, |s| s.players_removed),
        players: service.store().len(),
    };
    service.stop();

    render(output, &report, |report, w| {
        if !report.enabled {
            return writeln!(w, "tracker is disabled; nothing pruned");
        }
        writeln!(
            w,
            "pruned {} dates and {} players older than {} months; {} players tracked",
            report.dates_removed, report.players_removed, report.retention_months, report.players
        )
    })
}
