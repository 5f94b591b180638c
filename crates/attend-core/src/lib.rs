//! attend-core — per-player monthly activity tracking for game servers.
//!
//! Records which UTC calendar days each player was seen, keeps a rolling
//! active-days-this-month count, persists everything to one JSON document,
//! prunes stamps older than a retention window, and answers ranking and
//! lookup queries through a text command surface.
//!
//! # Conventions
//!
//! - **Errors**: `anyhow::Result` at I/O seams; typed `thiserror` errors in
//!   [`error`] where callers can act on the variant.
//! - **Logging**: `tracing` macros (`info!`, `warn!`, `error!`, `debug!`).

pub mod command;
pub mod config;
pub mod error;
pub mod host;
pub mod model;
pub mod query;
pub mod store;
pub mod tracker;

pub use command::CommandOutcome;
pub use config::TrackerConfig;
pub use host::{ActivityService, NoDirectory, PlayerDirectory, PlayerVerified};
pub use model::{ActivityRecord, DayStamp};
pub use store::ActivityStore;
pub use tracker::{ActivityTracker, PruneStats};
