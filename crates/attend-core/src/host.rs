//! Host-server integration surface.
//!
//! The game server is an external collaborator: it delivers player-verified
//! events and periodic ticks, and exposes a live-player directory for
//! lookups. [`ActivityService`] is the explicit instance the host owns and
//! routes those events through — there is no process-wide singleton. Attach
//! by constructing it with [`ActivityService::start`], detach by calling
//! [`ActivityService::stop`], which performs the final flush.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::command::{self, CommandOutcome};
use crate::config::TrackerConfig;
use crate::store::ActivityStore;
use crate::tracker::{ActivityTracker, PruneStats};

/// Inbound "player verified" event from the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerVerified {
    pub user_id: String,
    pub display_name: String,
    pub timestamp: DateTime<Utc>,
}

/// A currently-connected player resolved from the host's roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnlinePlayer {
    pub user_id: String,
    pub display_name: String,
}

/// Live-player lookup provided by the host.
///
/// Resolution order expected of implementations: exact id, then
/// case-insensitive name, then id substring. A miss is fine — queries fall
/// back to historical store data.
pub trait PlayerDirectory {
    fn resolve(&self, term: &str) -> Option<OnlinePlayer>;
}

/// Directory for hosts without a live roster; every lookup falls through to
/// history.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDirectory;

impl PlayerDirectory for NoDirectory {
    fn resolve(&self, _term: &str) -> Option<OnlinePlayer> {
        None
    }
}

/// The tracker plus its config, wired for host event dispatch.
#[derive(Debug)]
pub struct ActivityService {
    config: TrackerConfig,
    tracker: ActivityTracker,
}

impl ActivityService {
    /// Load persisted data and stand the tracker up.
    #[must_use]
    pub fn start(config: TrackerConfig) -> Self {
        let store = ActivityStore::load(&config.data_path);
        info!(players = store.len(), "player activity tracker enabled");
        Self {
            config,
            tracker: ActivityTracker::new(store),
        }
    }

    /// Handle a player-verified event. Returns `true` when a new active day
    /// was recorded. No-op while disabled by config.
    pub fn on_player_verified(&mut self, event: &PlayerVerified) -> bool {
        if !self.config.is_enabled {
            return false;
        }
        self.tracker
            .record_visit(&event.user_id, &event.display_name, event.timestamp)
    }

    /// Handle a periodic host checkpoint (round restart, idle tick).
    pub fn on_tick(&mut self, now: DateTime<Utc>) -> Option<PruneStats> {
        if !self.config.is_enabled {
            return None;
        }
        self.tracker
            .on_tick(self.config.data_retention_months, now)
    }

    /// Force a retention prune regardless of the once-per-day gate.
    /// Still a no-op while disabled by config, like every mutation path.
    pub fn force_prune(&mut self, now: DateTime<Utc>) -> Option<PruneStats> {
        if !self.config.is_enabled {
            return None;
        }
        Some(
            self.tracker
                .prune_old_data(self.config.data_retention_months, now),
        )
    }

    /// Handle a `playeractivity` command invocation. Read-only.
    #[must_use]
    pub fn on_command(
        &self,
        directory: &dyn PlayerDirectory,
        now: DateTime<Utc>,
        args: &[&str],
    ) -> CommandOutcome {
        command::execute(self.tracker.store(), directory, now, args)
    }

    #[must_use]
    pub fn store(&self) -> &ActivityStore {
        self.tracker.store()
    }

    #[must_use]
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Detach: final flush, then drop. A disabled tracker never attached, so
    /// it leaves no data file behind either.
    pub fn stop(self) {
        if self.config.is_enabled {
            self.tracker.flush();
        }
        info!("player activity tracker disabled");
    }
}
