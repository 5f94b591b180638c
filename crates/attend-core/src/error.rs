use std::path::PathBuf;

use thiserror::Error;

/// A string that is not a canonical zero-padded `YYYY-MM-DD` calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid day stamp {0:?}: expected zero-padded YYYY-MM-DD")]
pub struct DayStampError(pub String);

/// Failure while persisting the activity store.
///
/// The store swallows these after logging them (in-memory state stays
/// authoritative), but they are typed so callers that want to retry can.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("serialize activity data")]
    Serialize(#[from] serde_json::Error),

    #[error("persist activity data to {path}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
