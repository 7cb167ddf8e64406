//! Local persistence and expiry of HydraTrack daily records.
//!
//! This crate owns every persisted value of the tracker: one record per
//! calendar day plus a single set of goals, kept in a pluggable key-value
//! backend.
//!
//! # Features
//!
//! - Date-keyed daily records that reset 24 hours after their last write
//! - Retention sweep removing records older than a week
//! - Goal settings with per-field defaults
//! - Cancellable background expiry watchdog
//! - In-memory and SQLite backends
//! - A [`Tracker`] session that keeps displayed counters and storage in step
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use hydra_store::{DailyRecordStore, SqliteStore, SystemClock, Tracker};
//! use hydra_types::IntakeKind;
//!
//! let records = Arc::new(DailyRecordStore::new(
//!     SqliteStore::open_default()?,
//!     SystemClock::local(),
//! ));
//! let tracker = Tracker::open(records);
//! tracker.add_intake(IntakeKind::Water, 1)?;
//!
//! let snapshot = tracker.snapshot();
//! println!("{:.0}% of water goal", snapshot.water.percentage);
//! # Ok::<(), hydra_store::Error>(())
//! ```

mod backend;
mod clock;
mod daily;
mod error;
pub mod keys;
mod schema;
mod sqlite;
mod tracker;
mod watch;

pub use backend::{MemoryStore, RecordStore};
pub use clock::{Clock, ManualClock, SystemClock};
pub use daily::{
    DEFAULT_RETENTION_DAYS, DailyRecordStore, EXPIRY_WINDOW, SweepReport, TodayEntry, is_expired,
};
pub use error::{Error, Result};
pub use keys::{date_key, goals_key};
pub use sqlite::SqliteStore;
pub use tracker::Tracker;
pub use watch::{
    DEFAULT_CHECK_INTERVAL, WatchHandle, WatchOptions, WatchOptionsBuilder, start_expiry_watch,
    start_expiry_watch_with,
};

/// Default database path following platform conventions.
///
/// - Linux: `~/.local/share/hydratrack/data.db`
/// - macOS: `~/Library/Application Support/hydratrack/data.db`
/// - Windows: `C:\Users\<user>\AppData\Local\hydratrack\data.db`
pub fn default_db_path() -> std::path::PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("hydratrack")
        .join("data.db")
}
