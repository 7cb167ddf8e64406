//! Core types for daily intake tracking.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::error::GoalError;

/// Default daily water goal, in glasses.
pub const DEFAULT_WATER_GOAL: u32 = 8;

/// Default daily calorie goal, in kilocalories.
pub const DEFAULT_CALORIE_GOAL: u32 = 2000;

/// Which counter an intake operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum IntakeKind {
    /// Water, counted in glasses.
    Water,
    /// Food energy, counted in kilocalories.
    Calories,
}

impl IntakeKind {
    /// Unit label used when displaying amounts of this kind.
    #[must_use]
    pub fn unit(self) -> &'static str {
        match self {
            IntakeKind::Water => "glasses",
            IntakeKind::Calories => "kcal",
        }
    }
}

impl fmt::Display for IntakeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntakeKind::Water => write!(f, "water"),
            IntakeKind::Calories => write!(f, "calorie"),
        }
    }
}

/// Today's running totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Intake {
    /// Glasses of water logged today.
    pub water_intake: u32,
    /// Kilocalories logged today.
    pub calorie_intake: u32,
}

impl Intake {
    /// Create an intake pair.
    #[must_use]
    pub fn new(water_intake: u32, calorie_intake: u32) -> Self {
        Self {
            water_intake,
            calorie_intake,
        }
    }

    /// The zero record returned for absent, corrupt or expired days.
    #[must_use]
    pub fn zero() -> Self {
        Self::default()
    }

    /// Whether both counters are zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.water_intake == 0 && self.calorie_intake == 0
    }

    /// Read one counter.
    #[must_use]
    pub fn get(&self, kind: IntakeKind) -> u32 {
        match kind {
            IntakeKind::Water => self.water_intake,
            IntakeKind::Calories => self.calorie_intake,
        }
    }

    /// Overwrite one counter.
    pub fn set(&mut self, kind: IntakeKind, value: u32) {
        match kind {
            IntakeKind::Water => self.water_intake = value,
            IntakeKind::Calories => self.calorie_intake = value,
        }
    }

    /// Add to one counter, saturating at `u32::MAX`.
    pub fn add(&mut self, kind: IntakeKind, amount: u32) {
        let value = self.get(kind).saturating_add(amount);
        self.set(kind, value);
    }
}

/// A single day's persisted record.
///
/// The `date` is the calendar day the record is keyed under; `timestamp` is
/// the instant of the last write and only drives expiration and cleanup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyRecord {
    /// Calendar day the record belongs to.
    pub date: Date,
    /// Logged totals.
    pub intake: Intake,
    /// When the record was last written.
    pub timestamp: OffsetDateTime,
}

impl DailyRecord {
    /// Create a record stamped at `timestamp` for that instant's calendar day.
    #[must_use]
    pub fn new(intake: Intake, timestamp: OffsetDateTime) -> Self {
        Self {
            date: timestamp.date(),
            intake,
            timestamp,
        }
    }
}

/// Daily goals. A single value exists for the whole store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct GoalSettings {
    /// Target glasses of water per day.
    pub water_goal: u32,
    /// Target kilocalories per day.
    pub calorie_goal: u32,
}

impl Default for GoalSettings {
    fn default() -> Self {
        Self {
            water_goal: DEFAULT_WATER_GOAL,
            calorie_goal: DEFAULT_CALORIE_GOAL,
        }
    }
}

impl GoalSettings {
    /// Create goal settings without validating them.
    #[must_use]
    pub fn new(water_goal: u32, calorie_goal: u32) -> Self {
        Self {
            water_goal,
            calorie_goal,
        }
    }

    /// Goal for one kind.
    #[must_use]
    pub fn goal(&self, kind: IntakeKind) -> u32 {
        match kind {
            IntakeKind::Water => self.water_goal,
            IntakeKind::Calories => self.calorie_goal,
        }
    }

    /// Check that both goals are positive.
    pub fn validate(&self) -> Result<(), GoalError> {
        for kind in [IntakeKind::Water, IntakeKind::Calories] {
            let value = self.goal(kind);
            if value == 0 {
                return Err(GoalError::NotPositive { kind, value });
            }
        }
        Ok(())
    }
}

/// Progress toward one goal.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Progress {
    /// Amount logged so far.
    pub current: u32,
    /// Target amount.
    pub goal: u32,
    /// `current / goal * 100`, may exceed 100.
    pub percentage: f64,
    /// `percentage` clamped to 100, for bar widths.
    pub display_percentage: f64,
    /// Whether the goal has been reached.
    pub goal_met: bool,
}

impl Progress {
    /// Compute progress of `current` against `goal`.
    ///
    /// A zero goal yields 0% rather than a non-finite value.
    #[must_use]
    pub fn new(current: u32, goal: u32) -> Self {
        let percentage = if goal == 0 {
            0.0
        } else {
            f64::from(current) / f64::from(goal) * 100.0
        };
        Self {
            current,
            goal,
            percentage,
            display_percentage: percentage.min(100.0),
            goal_met: goal > 0 && current >= goal,
        }
    }
}

/// Everything a progress renderer needs for today.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Snapshot {
    /// Calendar day the snapshot describes.
    #[cfg_attr(feature = "serde", serde(serialize_with = "serialize_date"))]
    pub date: Date,
    /// Water progress.
    pub water: Progress,
    /// Calorie progress.
    pub calories: Progress,
    /// Goals in effect.
    pub goals: GoalSettings,
}

impl Snapshot {
    /// Build a snapshot from totals and goals.
    #[must_use]
    pub fn new(date: Date, intake: Intake, goals: GoalSettings) -> Self {
        Self {
            date,
            water: Progress::new(intake.water_intake, goals.water_goal),
            calories: Progress::new(intake.calorie_intake, goals.calorie_goal),
            goals,
        }
    }

    /// Progress for one kind.
    #[must_use]
    pub fn progress(&self, kind: IntakeKind) -> &Progress {
        match kind {
            IntakeKind::Water => &self.water,
            IntakeKind::Calories => &self.calories,
        }
    }
}

/// Format a date as `YYYY-MM-DD`.
#[must_use]
pub fn iso_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

#[cfg(feature = "serde")]
fn serialize_date<S: serde::Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&iso_date(*date))
}
