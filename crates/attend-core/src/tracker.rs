//! Visit recording and retention pruning.
//!
//! The tracker is the only writer of activity data: everything else reads
//! the [`ActivityStore`] it owns. All day math is UTC calendar days.

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use tracing::{debug, info};

use crate::model::{ActivityRecord, DayStamp};
use crate::store::ActivityStore;

/// What a retention prune removed, for logs and command output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct PruneStats {
    pub dates_removed: usize,
    pub players_removed: usize,
}

/// The single writer over an [`ActivityStore`].
#[derive(Debug)]
pub struct ActivityTracker {
    store: ActivityStore,
    /// UTC day of the last retention prune; ticks on the same day are no-ops.
    last_prune_day: Option<NaiveDate>,
}

impl ActivityTracker {
    #[must_use]
    pub fn new(store: ActivityStore) -> Self {
        Self {
            store,
            last_prune_day: None,
        }
    }

    /// Read access for the query layer.
    #[must_use]
    pub fn store(&self) -> &ActivityStore {
        &self.store
    }

    /// Record that a player was seen at `now`.
    ///
    /// Idempotent per UTC day: a repeat visit on an already-recorded day
    /// refreshes the display name but triggers no recompute and no save.
    /// Returns `true` when a new day was recorded.
    pub fn record_visit(&mut self, user_id: &str, display_name: &str, now: DateTime<Utc>) -> bool {
        let stamp = DayStamp::from_datetime(now);
        let month = month_key(now);

        let record = self.store.upsert(user_id, display_name);
        if !record.active_dates.insert(stamp) {
            return false;
        }
        record.current_month_active_days = count_in_month(record, &month);
        debug!(
            user_id,
            day = %DayStamp::from_datetime(now),
            month_days = record.current_month_active_days,
            "recorded visit"
        );
        self.store.save();
        true
    }

    /// Drop every stamp older than `now` minus `retention_months` calendar
    /// months, recompute month caches, and delete records left empty.
    ///
    /// Saves exactly once, whether or not anything changed.
    pub fn prune_old_data(&mut self, retention_months: u32, now: DateTime<Utc>) -> PruneStats {
        let cutoff = now
            .date_naive()
            .checked_sub_months(Months::new(retention_months))
            .map(DayStamp::from_date);
        let month = month_key(now);

        let mut stats = PruneStats::default();
        let mut emptied = Vec::new();
        for record in self.store.records_mut() {
            if let Some(cutoff) = &cutoff {
                let before = record.active_dates.len();
                record.active_dates.retain(|stamp| stamp >= cutoff);
                stats.dates_removed += before - record.active_dates.len();
            }
            record.current_month_active_days = count_in_month(record, &month);
            if record.active_dates.is_empty() {
                emptied.push(record.user_id.clone());
            }
        }
        for user_id in emptied {
            self.store.remove(&user_id);
            stats.players_removed += 1;
        }

        info!(
            dates_removed = stats.dates_removed,
            players_removed = stats.players_removed,
            "pruned old activity data"
        );
        self.store.save();
        stats
    }

    /// Periodic checkpoint from the host. Runs the retention prune at most
    /// once per UTC day, however often the host ticks.
    pub fn on_tick(&mut self, retention_months: u32, now: DateTime<Utc>) -> Option<PruneStats> {
        let today = now.date_naive();
        if self.last_prune_day.is_some_and(|last| today <= last) {
            return None;
        }
        self.last_prune_day = Some(today);
        Some(self.prune_old_data(retention_months, now))
    }

    /// Final flush on controlled shutdown.
    pub fn flush(&self) {
        self.store.save();
    }
}

/// Count of `record.active_dates` entries in `now`'s UTC month.
///
/// Pure; this is the function `currentMonthActiveDays` caches.
#[must_use]
pub fn current_month_count(record: &ActivityRecord, now: DateTime<Utc>) -> u32 {
    count_in_month(record, &month_key(now))
}

fn count_in_month(record: &ActivityRecord, month: &str) -> u32 {
    let count = record
        .active_dates
        .iter()
        .filter(|stamp| stamp.month_prefix() == month)
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

fn month_key(now: DateTime<Utc>) -> String {
    format!("{:04}-{:02}", now.year(), now.month())
}
