//! `att activity` — the `playeractivity` command surface: leaderboard with
//! no argument, per-player summary with one. Read-only; never saves.

use std::io::Write;

use anyhow::Result;
use attend_core::host::NoDirectory;
use attend_core::store::ActivityStore;
use attend_core::{TrackerConfig, command};
use clap::Args;

use crate::cmd::resolve_now;
use crate::output::{OutputMode, render};

/// Arguments for `att activity`.
#[derive(Args, Debug)]
pub struct ActivityArgs {
    /// Player id or name to look up; omit for the leaderboard.
    pub term: Option<String>,

    /// Evaluate "this month" at this instant, RFC 3339; defaults to now.
    #[arg(long)]
    pub at: Option<String>,
}

/// Execute `att activity`.
pub fn run_activity(args: &ActivityArgs, config: &TrackerConfig, output: OutputMode) -> Result<()> {
    let now = resolve_now(args.at.as_deref())?;
    let store = ActivityStore::load(&config.data_path);

    let cmd_args: Vec<&str> = args.term.as_deref().into_iter().collect();
    let outcome = command::execute(&store, &NoDirectory, now, &cmd_args);

    render(output, &outcome, |outcome, w| {
        writeln!(w, "{}", outcome.response.trim_end())
    })?;

    if !outcome.success {
        anyhow::bail!("player not found");
    }
    Ok(())
}
