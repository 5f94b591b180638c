//! Persisted data model: day stamps, per-player records, and the document
//! that goes to disk.
//!
//! The JSON field names (`userId`, `lastKnownName`, `activeDates`,
//! `currentMonthActiveDays`) are pinned to the layout older deployments
//! already have on disk, so data files survive an upgrade unchanged.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DayStampError;

/// A canonical `YYYY-MM-DD` calendar-day stamp.
///
/// Stamps are zero-padded by construction: the only ways in are a
/// [`chrono::NaiveDate`] (formatted, never hand-assembled) or a validated
/// parse. That makes string order identical to chronological order, so a
/// plain comparison against a cutoff stamp is a valid date comparison and
/// the retention prune never needs to re-parse anything.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DayStamp(String);

impl DayStamp {
    /// Stamp for a calendar day.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.format("%Y-%m-%d").to_string())
    }

    /// Stamp for the UTC calendar day containing `at`.
    #[must_use]
    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        Self::from_date(at.date_naive())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The leading `YYYY-MM` of this stamp.
    #[must_use]
    pub fn month_prefix(&self) -> &str {
        &self.0[..7]
    }
}

impl FromStr for DayStamp {
    type Err = DayStampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| DayStampError(s.to_string()))?;
        let canonical = date.format("%Y-%m-%d").to_string();
        // chrono accepts un-padded fields; only the canonical spelling is a
        // valid stamp.
        if canonical != s {
            return Err(DayStampError(s.to_string()));
        }
        Ok(Self(canonical))
    }
}

impl TryFrom<String> for DayStamp {
    type Error = DayStampError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<DayStamp> for String {
    fn from(stamp: DayStamp) -> Self {
        stamp.0
    }
}

impl fmt::Display for DayStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One player's activity history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    #[serde(rename = "userId")]
    pub user_id: String,

    /// Refreshed on every visit, not just at creation.
    #[serde(rename = "lastKnownName")]
    pub last_known_name: String,

    /// Every UTC calendar day this player was seen, within the retention
    /// window. Set semantics make same-day duplicates impossible.
    #[serde(rename = "activeDates", default)]
    pub active_dates: BTreeSet<DayStamp>,

    /// Cached count of `active_dates` entries in the current UTC month.
    ///
    /// Persisted for layout compatibility, but it is a cache, not a source
    /// of truth: it is recomputed on every mutation and readers evaluating
    /// "this month" recompute from `active_dates` instead of trusting a
    /// value that may have been written in a previous month.
    #[serde(rename = "currentMonthActiveDays", default)]
    pub current_month_active_days: u32,
}

impl ActivityRecord {
    /// Fresh zero-state record.
    #[must_use]
    pub fn new(user_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            last_known_name: display_name.into(),
            active_dates: BTreeSet::new(),
            current_month_active_days: 0,
        }
    }

    /// Lifetime active-day count. Never persisted; always `active_dates.len()`.
    #[must_use]
    pub fn total_active_days(&self) -> usize {
        self.active_dates.len()
    }

    /// Up to `limit` most recent stamps, newest first.
    #[must_use]
    pub fn recent_dates(&self, limit: usize) -> Vec<DayStamp> {
        self.active_dates.iter().rev().take(limit).cloned().collect()
    }
}

/// The persisted document: everything under one `players` key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityData {
    #[serde(default)]
    pub players: BTreeMap<String, ActivityRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_stamp_requires_zero_padding() {
        assert!("2024-06-01".parse::<DayStamp>().is_ok());
        assert!("2024-6-1".parse::<DayStamp>().is_err());
        assert!("2024-06-1".parse::<DayStamp>().is_err());
        assert!("yesterday".parse::<DayStamp>().is_err());
        assert!("2024-13-01".parse::<DayStamp>().is_err());
        assert!("2024-02-30".parse::<DayStamp>().is_err());
    }

    #[test]
    fn day_stamp_string_order_is_date_order() {
        let early: DayStamp = "2023-12-31".parse().expect("valid stamp");
        let late: DayStamp = "2024-01-01".parse().expect("valid stamp");
        assert!(early < late);
    }

    #[test]
    fn day_stamp_month_prefix() {
        let stamp: DayStamp = "2024-06-15".parse().expect("valid stamp");
        assert_eq!(stamp.month_prefix(), "2024-06");
    }

    #[test]
    fn serde_rejects_malformed_stamps() {
        let err = serde_json::from_str::<DayStamp>("\"2024-6-1\"");
        assert!(err.is_err());
    }

    #[test]
    fn record_round_trips_with_legacy_field_names() {
        let mut record = ActivityRecord::new("U1", "Alice");
        record
            .active_dates
            .insert("2024-06-01".parse().expect("valid stamp"));
        record.current_month_active_days = 1;

        let json = serde_json::to_string(&record).expect("serialize record");
        assert!(json.contains("\"userId\""));
        assert!(json.contains("\"lastKnownName\""));
        assert!(json.contains("\"activeDates\""));
        assert!(json.contains("\"currentMonthActiveDays\""));

        let back: ActivityRecord = serde_json::from_str(&json).expect("deserialize record");
        assert_eq!(back, record);
    }

    #[test]
    fn total_active_days_is_set_size() {
        let mut record = ActivityRecord::new("U1", "Alice");
        for stamp in ["2024-05-30", "2024-06-01", "2024-06-02"] {
            record.active_dates.insert(stamp.parse().expect("valid stamp"));
        }
        assert_eq!(record.total_active_days(), 3);
    }

    #[test]
    fn recent_dates_are_newest_first() {
        let mut record = ActivityRecord::new("U1", "Alice");
        for stamp in ["2024-06-01", "2024-05-30", "2024-06-02"] {
            record.active_dates.insert(stamp.parse().expect("valid stamp"));
        }
        let recent = record.recent_dates(2);
        assert_eq!(
            recent.iter().map(DayStamp::as_str).collect::<Vec<_>>(),
            vec!["2024-06-02", "2024-06-01"]
        );
    }
}
