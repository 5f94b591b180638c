//! JSON-backed activity store.
//!
//! One small document holds every player record, so the store loads and
//! saves the whole map at once. Loading fails soft: a missing or unreadable
//! file yields an empty store and a log line rather than aborting host
//! startup. Saving is atomic from a reader's perspective (temp file in the
//! same directory, then rename) and write failures are logged and swallowed;
//! the in-memory map stays authoritative until the next successful save.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{error, info, warn};

use crate::error::StoreError;
use crate::model::{ActivityData, ActivityRecord};

/// In-memory `user_id -> ActivityRecord` map plus its backing file.
///
/// `BTreeMap` keying gives deterministic id-ascending enumeration, which is
/// what makes the ranking tie-break stable across runs.
#[derive(Debug)]
pub struct ActivityStore {
    path: PathBuf,
    data: ActivityData,
}

impl ActivityStore {
    /// Load the store from `path`, or start empty.
    ///
    /// Absence of the file is the normal first-run case. A read or parse
    /// failure is logged and also yields an empty store; the broken file is
    /// left in place until the next save overwrites it.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let data = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<ActivityData>(&raw) {
                Ok(data) => {
                    info!(
                        players = data.players.len(),
                        path = %path.display(),
                        "loaded activity data"
                    );
                    data
                }
                Err(err) => {
                    warn!(
                        %err,
                        path = %path.display(),
                        "activity data unreadable, starting empty"
                    );
                    ActivityData::default()
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no activity data file, starting empty");
                ActivityData::default()
            }
            Err(err) => {
                warn!(%err, path = %path.display(), "activity data unreadable, starting empty");
                ActivityData::default()
            }
        };
        Self { path, data }
    }

    /// Build a store around already-deserialized data (tests, migrations).
    #[must_use]
    pub fn from_data(path: impl Into<PathBuf>, data: ActivityData) -> Self {
        Self {
            path: path.into(),
            data,
        }
    }

    /// Persist the full map, logging instead of propagating on failure.
    pub fn save(&self) {
        if let Err(err) = self.try_save() {
            error!(error = %err, path = %self.path.display(), "failed to save activity data");
        }
    }

    /// Persist the full map atomically: serialize, write a temp file next to
    /// the target, then rename over it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if serialization or file I/O fails.
    pub fn try_save(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.data)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|source| StoreError::Persist {
            path: self.path.clone(),
            source,
        })?;

        let mut tmp = NamedTempFile::new_in(dir).map_err(|source| StoreError::Persist {
            path: self.path.clone(),
            source,
        })?;
        tmp.write_all(json.as_bytes())
            .map_err(|source| StoreError::Persist {
                path: self.path.clone(),
                source,
            })?;
        tmp.persist(&self.path).map_err(|err| StoreError::Persist {
            path: self.path.clone(),
            source: err.error,
        })?;
        Ok(())
    }

    #[must_use]
    pub fn get(&self, user_id: &str) -> Option<&ActivityRecord> {
        self.data.players.get(user_id)
    }

    /// Fetch-or-create a record, refreshing the display name either way.
    ///
    /// This is the only creation path into the map.
    pub fn upsert(&mut self, user_id: &str, display_name: &str) -> &mut ActivityRecord {
        let record = self
            .data
            .players
            .entry(user_id.to_string())
            .or_insert_with(|| ActivityRecord::new(user_id, display_name));
        record.last_known_name = display_name.to_string();
        record
    }

    /// Drop a record entirely. Only the retention prune calls this.
    pub fn remove(&mut self, user_id: &str) -> Option<ActivityRecord> {
        self.data.players.remove(user_id)
    }

    /// Records in ascending `user_id` order.
    pub fn records(&self) -> impl Iterator<Item = &ActivityRecord> {
        self.data.players.values()
    }

    pub(crate) fn records_mut(&mut self) -> impl Iterator<Item = &mut ActivityRecord> {
        self.data.players.values_mut()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.players.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.players.is_empty()
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}
