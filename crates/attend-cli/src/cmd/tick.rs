//! `att tick` — deliver a periodic host checkpoint.
//!
//! Runs the once-per-day prune gate exactly as a host's round-restart hook
//! would. Within one process the gate closes after the first prune of the
//! day; each `att tick` invocation is a fresh process, so `att prune` exists
//! when an unconditional prune is wanted.

use std::io::Write;

use anyhow::Result;
use attend_core::TrackerConfig;
use attend_core::host::ActivityService;
use clap::Args;
use serde::Serialize;

use crate::cmd::resolve_now;
use crate::output::{OutputMode, render};

/// Arguments for `att tick`.
#[derive(Args, Debug)]
pub struct TickArgs {
    /// Checkpoint timestamp, RFC 3339; defaults to now.
    #[arg(long)]
    pub at: Option<String>,
}

/// Report payload for `att tick`.
#[derive(Debug, Serialize)]
struct TickReport {
    pruned: bool,
    dates_removed: usize,
    players_removed: usize,
    players: usize,
}

/// Execute `att tick`.
pub fn run_tick(args: &TickArgs, config: &TrackerConfig, output: OutputMode) -> Result<()> {
    let now = resolve_now(args.at.as_deref())?;
    let mut service = ActivityService::start(config.clone());

    let stats = service.on_tick(now);
    let report = TickReport {
        pruned: stats.is_some(),
        dates_removed: stats.map_or(0, |s| s.dates_removed),
        players_removed: stats.map_or(0, |s| s.players_removed),
        players: service.store().len(),
    };
    service.stop();

    render(output, &report, |report, w| {
        if report.pruned {
            writeln!(
                w,
                "pruned {} dates, removed {} players; {} players tracked",
                report.dates_removed, report.players_removed, report.players
            )
        } else {
            writeln!(w, "nothing to do; {} players tracked", report.players)
        }
    })
}
