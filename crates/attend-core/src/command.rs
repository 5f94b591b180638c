//! The `playeractivity` text command: leaderboard with no arguments, a
//! per-player summary with one. Read-only by design — every mutation in
//! this crate happens on the event path, never the command path.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::host::PlayerDirectory;
use crate::query::{self, Lookup, RankEntry};
use crate::store::ActivityStore;

/// Primary command name.
pub const COMMAND: &str = "playeractivity";
/// Accepted aliases.
pub const ALIASES: [&str; 2] = ["pa", "pactivity"];
/// Leaderboard size for the no-argument invocation.
pub const RANKING_LIMIT: usize = 20;

/// Whether `name` invokes this command.
#[must_use]
pub fn matches_command(name: &str) -> bool {
    name == COMMAND || ALIASES.contains(&name)
}

/// The single text response written back through the host's sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandOutcome {
    pub success: bool,
    pub response: String,
}

/// Run the command against current state.
///
/// No arguments: top-[`RANKING_LIMIT`] leaderboard. One argument: player
/// lookup, where "not found" is a failure and "no activity yet" a success.
/// Extra arguments beyond the first are ignored, as the original command
/// surface did.
#[must_use]
pub fn execute(
    store: &ActivityStore,
    directory: &dyn PlayerDirectory,
    now: DateTime<Utc>,
    args: &[&str],
) -> CommandOutcome {
    match args.first() {
        None => CommandOutcome {
            success: true,
            response: render_ranking(&query::ranking(store, now, RANKING_LIMIT)),
        },
        Some(term) => match query::lookup(store, directory, now, term) {
            Lookup::NotFound => CommandOutcome {
                success: false,
                response: format!("No player matched \"{term}\""),
            },
            Lookup::NoActivity { name } => CommandOutcome {
                success: true,
                response: format!("{name} has no recorded activity yet"),
            },
            Lookup::Found(summary) => {
                let recent = summary
                    .recent_dates
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                CommandOutcome {
                    success: true,
                    response: format!(
                        "[{}]\nName: {}\nActive this month: {} days\nTotal active: {} days\nRecently seen: {recent}",
                        summary.user_id,
                        summary.name,
                        summary.current_month_days,
                        summary.total_days,
                    ),
                }
            }
        },
    }
}

fn render_ranking(entries: &[RankEntry]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== Monthly activity leaderboard ===");
    let _ = writeln!(out, "Rank | Player | Active days");
    let _ = writeln!(out, "----------------------------");
    for (i, entry) in entries.iter().enumerate() {
        let name = if entry.name.is_empty() {
            "Unknown"
        } else {
            entry.name.as_str()
        };
        let _ = writeln!(out, "{}. {name} | {} days", i + 1, entry.days);
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use tempfile::TempDir;

    use crate::host::NoDirectory;
    use crate::tracker::ActivityTracker;

    use super::*;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0)
            .single()
            .expect("valid test instant")
    }

    fn seeded_store(tmp: &TempDir) -> ActivityTracker {
        let mut tracker = ActivityTracker::new(ActivityStore::load(tmp.path().join("data.json")));
        tracker.record_visit("U1", "Alice", at(2024, 6, 1));
        tracker.record_visit("U1", "Alice", at(2024, 6, 2));
        tracker.record_visit("U2", "Bob", at(2024, 6, 2));
        tracker
    }

    #[test]
    fn command_names() {
        assert!(matches_command("playeractivity"));
        assert!(matches_command("pa"));
        assert!(matches_command("pactivity"));
        assert!(!matches_command("activity"));
    }

    #[test]
    fn no_args_renders_leaderboard() {
        let tmp = TempDir::new().expect("tempdir");
        let tracker = seeded_store(&tmp);

        let outcome = execute(tracker.store(), &NoDirectory, at(2024, 6, 15), &[]);
        assert!(outcome.success);
        assert!(outcome.response.contains("Monthly activity leaderboard"));
        assert!(outcome.response.contains("1. Alice | 2 days"));
        assert!(outcome.response.contains("2. Bob | 1 days"));
    }

    #[test]
    fn unknown_term_is_a_failure() {
        let tmp = TempDir::new().expect("tempdir");
        let tracker = seeded_store(&tmp);

        let outcome = execute(tracker.store(), &NoDirectory, at(2024, 6, 15), &["ghost"]);
        assert!(!outcome.success);
        assert!(outcome.response.contains("No player matched"));
    }

    #[test]
    fn known_player_renders_summary() {
        let tmp = TempDir::new().expect("tempdir");
        let tracker = seeded_store(&tmp);

        let outcome = execute(tracker.store(), &NoDirectory, at(2024, 6, 15), &["U1"]);
        assert!(outcome.success);
        assert!(outcome.response.contains("[U1]"));
        assert!(outcome.response.contains("Name: Alice"));
        assert!(outcome.response.contains("Active this month: 2 days"));
        assert!(outcome.response.contains("Total active: 2 days"));
        assert!(outcome.response.contains("Recently seen: 2024-06-02, 2024-06-01"));
    }

    #[test]
    fn command_never_mutates_state() {
        let tmp = TempDir::new().expect("tempdir");
        let tracker = seeded_store(&tmp);
        let before = tracker.store().len();

        let _ = execute(tracker.store(), &NoDirectory, at(2024, 6, 15), &["ghost"]);
        let _ = execute(tracker.store(), &NoDirectory, at(2024, 6, 15), &[]);

        assert_eq!(tracker.store().len(), before);
    }
}
