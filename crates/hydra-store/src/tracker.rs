//! Tracking session.
//!
//! A [`Tracker`] holds the displayed counters and goals for one session and
//! keeps today's stored record in step with them after every change.

use std::sync::{Arc, Mutex, MutexGuard};

use time::Date;
use tracing::{debug, info, warn};

use hydra_types::{GoalSettings, Intake, IntakeKind, Snapshot};

use crate::backend::RecordStore;
use crate::clock::Clock;
use crate::daily::{DEFAULT_RETENTION_DAYS, DailyRecordStore, SweepReport};
use crate::error::Result;

#[derive(Debug, Clone, Copy)]
struct SessionState {
    day: Date,
    intake: Intake,
    goals: GoalSettings,
}

/// In-memory view of today's totals and goals, backed by a [`DailyRecordStore`].
///
/// Shared between the front end and the expiry watchdog behind an `Arc`.
pub struct Tracker<S, C> {
    records: Arc<DailyRecordStore<S, C>>,
    state: Mutex<SessionState>,
    sweep: SweepReport,
}

impl<S: RecordStore, C: Clock> Tracker<S, C> {
    /// Start a session with the default retention horizon.
    pub fn open(records: Arc<DailyRecordStore<S, C>>) -> Self {
        Self::open_with(records, DEFAULT_RETENTION_DAYS)
    }

    /// Start a session.
    ///
    /// Sweeps records older than `retention_days`, loads goals and today's
    /// totals, and writes a zero record when today has no live one. A failed
    /// write here is logged; the session still opens with zero totals.
    pub fn open_with(records: Arc<DailyRecordStore<S, C>>, retention_days: u32) -> Self {
        let now = records.now();
        let sweep = records.cleanup_stale_with(now, retention_days);
        let goals = records.get_goals();

        let entry = records.load_today_entry();
        let intake = entry.intake();
        if !entry.is_live()
            && let Err(e) = records.save_today(0, 0)
        {
            warn!("Could not create today's record: {}", e);
        }

        debug!(
            "Session opened: water={}, calories={}, goals={}/{}",
            intake.water_intake, intake.calorie_intake, goals.water_goal, goals.calorie_goal
        );

        Self {
            records,
            state: Mutex::new(SessionState {
                day: now.date(),
                intake,
                goals,
            }),
            sweep,
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// The record store behind this session.
    pub fn records(&self) -> &Arc<DailyRecordStore<S, C>> {
        &self.records
    }

    /// What the opening sweep did.
    pub fn opening_sweep(&self) -> SweepReport {
        self.sweep
    }

    /// Current in-memory totals.
    pub fn intake(&self) -> Intake {
        self.lock().intake
    }

    /// Goals in effect.
    pub fn goals(&self) -> GoalSettings {
        self.lock().goals
    }

    /// Add `amount` to one counter and persist both counters.
    ///
    /// On a storage failure the in-memory counter keeps the new value and
    /// the error is returned.
    pub fn add_intake(&self, kind: IntakeKind, amount: u32) -> Result<Intake> {
        let mut state = self.lock();
        self.roll_day(&mut state);
        state.intake.add(kind, amount);
        self.persist(&state)?;
        Ok(state.intake)
    }

    /// Zero one counter and persist.
    pub fn reset_intake(&self, kind: IntakeKind) -> Result<Intake> {
        let mut state = self.lock();
        self.roll_day(&mut state);
        state.intake.set(kind, 0);
        info!("Reset {} intake", kind);
        self.persist(&state)?;
        Ok(state.intake)
    }

    /// Validate and persist new goals, then adopt them.
    pub fn set_goals(&self, goals: GoalSettings) -> Result<()> {
        let mut state = self.lock();
        self.records.set_goals(goals)?;
        state.goals = goals;
        Ok(())
    }

    /// Progress for today from the in-memory state.
    pub fn snapshot(&self) -> Snapshot {
        let state = self.lock();
        Snapshot::new(self.records.now().date(), state.intake, state.goals)
    }

    /// Zero both counters in memory. Hooked up as the watchdog's callback.
    pub fn reset_expired(&self) {
        let mut state = self.lock();
        state.intake = Intake::zero();
        info!("Daily totals expired, counters reset");
    }

    /// Re-read today's totals from the store.
    pub fn refresh(&self) -> Intake {
        let mut state = self.lock();
        let entry = self.records.load_today_entry();
        state.day = self.records.now().date();
        state.intake = entry.intake();
        state.intake
    }

    /// After midnight the counters start from the new day's record.
    fn roll_day(&self, state: &mut SessionState) {
        let today = self.records.now().date();
        if state.day != today {
            info!("Day changed, loading totals for {}", today);
            state.day = today;
            state.intake = self.records.load_today_entry().intake();
        }
    }

    fn persist(&self, state: &SessionState) -> Result<()> {
        self.records
            .save_today(state.intake.water_intake, state.intake.calorie_intake)
            .map(|_| ())
    }
}
