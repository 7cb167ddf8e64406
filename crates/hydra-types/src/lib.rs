//! Platform-agnostic types for the HydraTrack daily health tracker.
//!
//! This crate provides the data model shared by the store (hydra-store)
//! and the command-line front end (hydra-cli).
//!
//! # Features
//!
//! - Daily intake totals and per-day records
//! - Goal settings with defaults and validation
//! - Progress snapshots for renderers
//! - Lenient JSON encoding of persisted values (`serde` feature)
//!
//! # Example
//!
//! ```
//! use hydra_types::{GoalSettings, Intake, IntakeKind, Snapshot};
//! use time::macros::date;
//!
//! let mut intake = Intake::zero();
//! intake.add(IntakeKind::Water, 4);
//!
//! let snapshot = Snapshot::new(date!(2026 - 10 - 18), intake, GoalSettings::default());
//! assert_eq!(snapshot.water.percentage, 50.0);
//! ```

pub mod error;
pub mod types;
#[cfg(feature = "serde")]
pub mod wire;

pub use error::{GoalError, ParseError, ParseResult};
pub use types::{
    DEFAULT_CALORIE_GOAL, DEFAULT_WATER_GOAL, DailyRecord, GoalSettings, Intake, IntakeKind,
    Progress, Snapshot, iso_date,
};
#[cfg(feature = "serde")]
pub use wire::StoredRecord;
