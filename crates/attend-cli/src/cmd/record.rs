//! `att record` — feed one player-verified event into the tracker.

use std::io::Write;

use anyhow::Result;
use attend_core::TrackerConfig;
use attend_core::host::{ActivityService, PlayerVerified};
use attend_core::model::DayStamp;
use clap::Args;
use serde::Serialize;

use crate::cmd::resolve_now;
use crate::output::{OutputMode, render};

/// Arguments for `att record`.
#[derive(Args, Debug)]
pub struct RecordArgs {
    /// Stable player identifier (e.g. a steam id).
    pub user_id: String,

    /// Current display name.
    #[arg(long)]
    pub name: String,

    /// Event timestamp, RFC 3339; defaults to now.
    #[arg(long)]
    pub at: Option<String>,
}

/// Report payload for `att record`.
#[derive(Debug, Serialize)]
struct RecordReport {
    user_id: String,
    name: String,
    day: String,
    enabled: bool,
    /// `false` for a repeat visit on an already-recorded day.
    recorded: bool,
    current_month_active_days: u32,
    total_active_days: usize,
}

/// Execute `att record`.
pub fn run_record(args: &RecordArgs, config: &TrackerConfig, output: OutputMode) -> Result<()> {
    let now = resolve_now(args.at.as_deref())?;
    let mut service = ActivityService::start(config.clone());

    let recorded = service.on_player_verified(&PlayerVerified {
        user_id: args.user_id.clone(),
        display_name: args.name.clone(),
        timestamp: now,
    });

    let (month_days, total_days) = service
        .store()
        .get(&args.user_id)
        .map_or((0, 0), |record| {
            (record.current_month_active_days, record.total_active_days())
        });

    let report = RecordReport {
        user_id: args.user_id.clone(),
        name: args.name.clone(),
        day: DayStamp::from_datetime(now).to_string(),
        enabled: config.is_enabled,
        recorded,
        current_month_active_days: month_days,
        total_active_days: total_days,
    };
    service.stop();

    render(output, &report, |report, w| {
        if !report.enabled {
            return writeln!(w, "tracker is disabled; nothing recorded");
        }
        if report.recorded {
            writeln!(w, "recorded {} ({}) on {}", report.name, report.user_id, report.day)?;
        } else {
            writeln!(w, "{} already recorded for {}", report.user_id, report.day)?;
        }
        writeln!(
            w,
            "active this month: {} days, total: {} days",
            report.current_month_active_days, report.total_active_days
        )
    })
}
