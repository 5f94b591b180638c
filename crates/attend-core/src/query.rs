//! Read-only aggregation over the activity store: ranking and lookup.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::host::PlayerDirectory;
use crate::model::{ActivityRecord, DayStamp};
use crate::store::ActivityStore;
use crate::tracker::current_month_count;

/// How many recent stamps a player summary carries.
pub const RECENT_DATES: usize = 5;

/// One leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankEntry {
    pub user_id: String,
    pub name: String,
    pub days: u32,
}

/// Everything the command surface shows for one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerSummary {
    pub user_id: String,
    pub name: String,
    pub current_month_days: u32,
    pub total_days: usize,
    /// Newest first.
    pub recent_dates: Vec<DayStamp>,
}

/// Outcome of a player lookup. "No such player" and "known player with no
/// history yet" are deliberately distinct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    NotFound,
    NoActivity { name: String },
    Found(PlayerSummary),
}

/// Top `limit` players by active days in `now`'s UTC month.
///
/// Month counts are recomputed from `active_dates` rather than read from the
/// persisted cache, so a file written last month ranks correctly today.
/// Ties break by ascending `user_id`: the store enumerates in id order and
/// the sort is stable.
#[must_use]
pub fn ranking(store: &ActivityStore, now: DateTime<Utc>, limit: usize) -> Vec<RankEntry> {
    let mut entries: Vec<RankEntry> = store
        .records()
        .map(|record| RankEntry {
            user_id: record.user_id.clone(),
            name: record.last_known_name.clone(),
            days: current_month_count(record, now),
        })
        .collect();
    entries.sort_by(|a, b| b.days.cmp(&a.days));
    entries.truncate(limit);
    entries
}

/// Resolve `term` to a player and summarize their activity.
///
/// The live directory is consulted first (it knows current display names);
/// on a miss the same matching runs over historical records, so lookups by
/// id keep working when the player is offline or the host has no roster.
#[must_use]
pub fn lookup(
    store: &ActivityStore,
    directory: &dyn PlayerDirectory,
    now: DateTime<Utc>,
    term: &str,
) -> Lookup {
    if let Some(player) = directory.resolve(term) {
        return match store.get(&player.user_id) {
            Some(record) => Lookup::Found(summarize(record, now)),
            None => Lookup::NoActivity {
                name: player.display_name,
            },
        };
    }

    match find_historical(store, term) {
        Some(record) => Lookup::Found(summarize(record, now)),
        None => Lookup::NotFound,
    }
}

/// Exact id, then case-insensitive name, then id substring.
fn find_historical<'a>(store: &'a ActivityStore, term: &str) -> Option<&'a ActivityRecord> {
    store.get(term).or_else(|| {
        store.records().find(|record| {
            record.last_known_name.eq_ignore_ascii_case(term) || record.user_id.contains(term)
        })
    })
}

fn summarize(record: &ActivityRecord, now: DateTime<Utc>) -> PlayerSummary {
    PlayerSummary {
        user_id: record.user_id.clone(),
        name: record.last_known_name.clone(),
        current_month_days: current_month_count(record, now),
        total_days: record.total_active_days(),
        recent_dates: record.recent_dates(RECENT_DATES),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use tempfile::TempDir;

    use crate::host::{NoDirectory, OnlinePlayer};
    use crate::tracker::ActivityTracker;

    use super::*;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0)
            .single()
            .expect("valid test instant")
    }

    fn seeded_tracker(tmp: &TempDir, visits: &[(&str, &str, DateTime<Utc>)]) -> ActivityTracker {
        let mut tracker = ActivityTracker::new(ActivityStore::load(tmp.path().join("data.json")));
        for (user_id, name, when) in visits {
            tracker.record_visit(user_id, name, *when);
        }
        tracker
    }

    struct OnePlayer(OnlinePlayer);

    impl PlayerDirectory for OnePlayer {
        fn resolve(&self, term: &str) -> Option<OnlinePlayer> {
            (self.0.user_id.contains(term)
                || self.0.display_name.eq_ignore_ascii_case(term))
            .then(|| self.0.clone())
        }
    }

    #[test]
    fn ranking_orders_by_days_then_id() {
        let tmp = TempDir::new().expect("tempdir");
        let tracker = seeded_tracker(
            &tmp,
            &[
                ("U3", "Carol", at(2024, 6, 1)),
                ("U2", "Bob", at(2024, 6, 1)),
                ("U2", "Bob", at(2024, 6, 2)),
                ("U1", "Alice", at(2024, 6, 3)),
                ("U1", "Alice", at(2024, 6, 4)),
            ],
        );

        let entries = ranking(tracker.store(), at(2024, 6, 15), 10);
        let ids: Vec<_> = entries.iter().map(|e| e.user_id.as_str()).collect();
        // U1 and U2 tie on 2 days; ascending id breaks the tie.
        assert_eq!(ids, vec!["U1", "U2", "U3"]);
    }

    #[test]
    fn ranking_respects_limit_under_ties() {
        let tmp = TempDir::new().expect("tempdir");
        let mut tracker = ActivityTracker::new(ActivityStore::load(tmp.path().join("data.json")));
        for day in 1..=5 {
            tracker.record_visit("U1", "Alice", at(2024, 6, day));
            tracker.record_visit("U2", "Bob", at(2024, 6, day));
        }
        tracker.record_visit("U3", "Carol", at(2024, 6, 1));

        let entries = ranking(tracker.store(), at(2024, 6, 15), 2);
        let ids: Vec<_> = entries.iter().map(|e| e.user_id.as_str()).collect();
        assert_eq!(ids, vec!["U1", "U2"]);
    }

    #[test]
    fn ranking_recomputes_across_month_boundary() {
        let tmp = TempDir::new().expect("tempdir");
        let tracker = seeded_tracker(&tmp, &[("U1", "Alice", at(2024, 6, 28))]);

        // The persisted cache says 1; evaluated in July it must rank as 0.
        let entries = ranking(tracker.store(), at(2024, 7, 3), 10);
        assert_eq!(entries[0].days, 0);
    }

    #[test]
    fn lookup_miss_everywhere_is_not_found() {
        let tmp = TempDir::new().expect("tempdir");
        let tracker = seeded_tracker(&tmp, &[]);
        let result = lookup(tracker.store(), &NoDirectory, at(2024, 6, 15), "ghost");
        assert_eq!(result, Lookup::NotFound);
    }

    #[test]
    fn lookup_live_player_without_history_is_no_activity() {
        let tmp = TempDir::new().expect("tempdir");
        let tracker = seeded_tracker(&tmp, &[]);
        let directory = OnePlayer(OnlinePlayer {
            user_id: "U9@steam".to_string(),
            display_name: "Dave".to_string(),
        });

        let result = lookup(tracker.store(), &directory, at(2024, 6, 15), "dave");
        assert_eq!(
            result,
            Lookup::NoActivity {
                name: "Dave".to_string()
            }
        );
    }

    #[test]
    fn lookup_falls_back_to_history_by_id() {
        let tmp = TempDir::new().expect("tempdir");
        let tracker = seeded_tracker(&tmp, &[("U1@steam", "Alice", at(2024, 6, 1))]);

        let result = lookup(tracker.store(), &NoDirectory, at(2024, 6, 15), "U1@steam");
        match result {
            Lookup::Found(summary) => {
                assert_eq!(summary.user_id, "U1@steam");
                assert_eq!(summary.current_month_days, 1);
                assert_eq!(summary.total_days, 1);
            }
            other => panic!("expected Found, got {other:?}"),
        }
    }

    #[test]
    fn lookup_matches_history_name_case_insensitively() {
        let tmp = TempDir::new().expect("tempdir");
        let tracker = seeded_tracker(&tmp, &[("U1", "Alice", at(2024, 6, 1))]);

        let result = lookup(tracker.store(), &NoDirectory, at(2024, 6, 15), "ALICE");
        assert!(matches!(result, Lookup::Found(_)));
    }

    #[test]
    fn summary_recent_dates_cap_at_five_newest() {
        let tmp = TempDir::new().expect("tempdir");
        let mut tracker = ActivityTracker::new(ActivityStore::load(tmp.path().join("data.json")));
        for day in 1..=7 {
            tracker.record_visit("U1", "Alice", at(2024, 6, day));
        }

        let result = lookup(tracker.store(), &NoDirectory, at(2024, 6, 15), "U1");
        let Lookup::Found(summary) = result else {
            panic!("expected Found");
        };
        let recent: Vec<_> = summary.recent_dates.iter().map(DayStamp::as_str).collect();
        assert_eq!(
            recent,
            vec!["2024-06-07", "2024-06-06", "2024-06-05", "2024-06-04", "2024-06-03"]
        );
    }
}
