//! Per-day record lifecycle: read, write, expiry, retention sweep and goals.

use std::sync::{Mutex, MutexGuard};

use time::{Duration, OffsetDateTime};
use tracing::{debug, info, warn};

use hydra_types::wire::{self, StoredRecord};
use hydra_types::{DailyRecord, GoalSettings, Intake};

use crate::backend::RecordStore;
use crate::clock::Clock;
use crate::error::Result;
use crate::keys::{date_key, goals_key, is_record_key};

/// How long a record stays live after its last write.
pub const EXPIRY_WINDOW: Duration = Duration::hours(24);

/// Default retention horizon of the sweep, in days.
pub const DEFAULT_RETENTION_DAYS: u32 = 7;

/// Whether a record written at `timestamp` has expired at `now`.
///
/// A missing timestamp counts as expired.
pub fn is_expired(timestamp: Option<OffsetDateTime>, now: OffsetDateTime) -> bool {
    match timestamp {
        Some(ts) => now - ts >= EXPIRY_WINDOW,
        None => true,
    }
}

/// What was found under today's key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodayEntry {
    /// Nothing stored (or the backend could not be read).
    Missing,
    /// A value that does not parse. It is left in place for the sweep.
    Corrupt,
    /// An expired record, now removed.
    Expired,
    /// A live record.
    Live(StoredRecord),
}

impl TodayEntry {
    /// The totals this entry stands for: zero unless live.
    pub fn intake(&self) -> Intake {
        match self {
            TodayEntry::Live(record) => record.intake,
            _ => Intake::zero(),
        }
    }

    /// Whether a live record exists.
    pub fn is_live(&self) -> bool {
        matches!(self, TodayEntry::Live(_))
    }
}

/// Outcome of a retention sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Keys in the record namespace that were examined.
    pub scanned: usize,
    /// Keys deleted.
    pub removed: usize,
}

/// Owner of every persisted record and of the goal settings.
///
/// Compound operations (read-then-expire, write, sweep, watchdog check) are
/// serialized behind one internal lock, so an expiry check can never
/// interleave with a write of today's record.
///
/// # Example
///
/// ```
/// use hydra_store::{DailyRecordStore, ManualClock, MemoryStore};
/// use hydra_types::Intake;
/// use time::macros::datetime;
///
/// let records = DailyRecordStore::new(
///     MemoryStore::new(),
///     ManualClock::new(datetime!(2026-10-18 09:00:00 UTC)),
/// );
/// records.save_today(3, 450)?;
/// assert_eq!(records.load_today(), Intake::new(3, 450));
/// # Ok::<(), hydra_store::Error>(())
/// ```
pub struct DailyRecordStore<S, C> {
    store: S,
    clock: C,
    op_lock: Mutex<()>,
}

impl<S: RecordStore, C: Clock> DailyRecordStore<S, C> {
    /// Wrap a backend and a clock.
    pub fn new(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
            op_lock: Mutex::new(()),
        }
    }

    /// The underlying backend.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The clock used for "now".
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Current instant according to the injected clock.
    pub fn now(&self) -> OffsetDateTime {
        self.clock.now()
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        // The lock protects no data, so a poisoned guard is still usable.
        self.op_lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    // === Today's record ===

    /// Today's totals: zero when absent, corrupt or expired.
    ///
    /// An expired record is removed as a side effect. Never fails.
    pub fn load_today(&self) -> Intake {
        self.load_today_entry().intake()
    }

    /// Inspect today's key, removing the record if it has expired.
    pub fn load_today_entry(&self) -> TodayEntry {
        let _guard = self.guard();
        let now = self.clock.now();
        let key = date_key(now);

        let raw = match self.store.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return TodayEntry::Missing,
            Err(e) => {
                warn!("Failed to read {}: {}", key, e);
                return TodayEntry::Missing;
            }
        };

        let record = match wire::decode_record(&raw) {
            Ok(record) => record,
            Err(e) => {
                warn!("Ignoring corrupt record {}: {}", key, e);
                return TodayEntry::Corrupt;
            }
        };

        if is_expired(record.timestamp, now) {
            info!("Record {} is older than 24 hours, starting fresh", key);
            if let Err(e) = self.store.remove(&key) {
                warn!("Failed to remove expired record {}: {}", key, e);
            }
            return TodayEntry::Expired;
        }

        debug!(
            "Loaded {}: water={}, calories={}",
            key, record.intake.water_intake, record.intake.calorie_intake
        );
        TodayEntry::Live(record)
    }

    /// Write today's totals, stamped with the current instant.
    ///
    /// The whole record is written with a single `set`. On failure nothing
    /// is retried and the caller's in-memory totals stay authoritative.
    pub fn save_today(&self, water_intake: u32, calorie_intake: u32) -> Result<DailyRecord> {
        let _guard = self.guard();
        let record = DailyRecord::new(
            Intake::new(water_intake, calorie_intake),
            self.clock.now(),
        );
        let key = date_key(record.timestamp);
        let value = wire::encode_record(&record)?;

        self.store.set(&key, &value).inspect_err(|e| {
            warn!("Failed to save {}: {}", key, e);
        })?;

        debug!(
            "Saved {}: water={}, calories={}",
            key, water_intake, calorie_intake
        );
        Ok(record)
    }

    /// Remove today's record if it has expired since it was last read.
    ///
    /// Returns `true` when a record was removed. Missing or corrupt values
    /// are left alone.
    pub fn expire_today_if_stale(&self) -> bool {
        let _guard = self.guard();
        let now = self.clock.now();
        let key = date_key(now);

        let raw = match self.store.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return false,
            Err(e) => {
                warn!("Expiry check could not read {}: {}", key, e);
                return false;
            }
        };

        match wire::decode_record(&raw) {
            Ok(record) if is_expired(record.timestamp, now) => {
                if let Err(e) = self.store.remove(&key) {
                    warn!("Failed to remove expired record {}: {}", key, e);
                }
                info!("24 hours passed, reset {}", key);
                true
            }
            Ok(_) => false,
            Err(e) => {
                warn!("Expiry check found corrupt record {}: {}", key, e);
                false
            }
        }
    }

    // === Retention sweep ===

    /// Delete records older than [`DEFAULT_RETENTION_DAYS`].
    pub fn cleanup_stale(&self, now: OffsetDateTime) -> SweepReport {
        self.cleanup_stale_with(now, DEFAULT_RETENTION_DAYS)
    }

    /// Delete every record in the namespace that is corrupt, has no
    /// timestamp, or was last written before `now - max_age_days`.
    ///
    /// Deletions happen after the scan finishes. The goals key is never
    /// touched. Failures are logged and skipped.
    pub fn cleanup_stale_with(&self, now: OffsetDateTime, max_age_days: u32) -> SweepReport {
        let _guard = self.guard();
        let cutoff = now - Duration::days(i64::from(max_age_days));
        let mut report = SweepReport::default();

        let keys = match self.store.keys() {
            Ok(keys) => keys,
            Err(e) => {
                warn!("Cleanup skipped, cannot list keys: {}", e);
                return report;
            }
        };

        let mut doomed = Vec::new();
        for key in keys.into_iter().filter(|k| is_record_key(k)) {
            report.scanned += 1;

            let raw = match self.store.get(&key) {
                Ok(Some(raw)) => raw,
                Ok(None) => continue,
                Err(e) => {
                    warn!("Cleanup could not read {}: {}", key, e);
                    continue;
                }
            };

            match wire::decode_record(&raw) {
                Err(e) => {
                    debug!("Purging corrupt record {}: {}", key, e);
                    doomed.push(key);
                }
                Ok(StoredRecord {
                    timestamp: None, ..
                }) => {
                    debug!("Purging record without timestamp {}", key);
                    doomed.push(key);
                }
                Ok(StoredRecord {
                    timestamp: Some(ts),
                    ..
                }) if ts < cutoff => {
                    debug!("Purging stale record {} (written {})", key, ts);
                    doomed.push(key);
                }
                Ok(_) => {}
            }
        }

        for key in doomed {
            match self.store.remove(&key) {
                Ok(()) => report.removed += 1,
                Err(e) => warn!("Failed to remove {}: {}", key, e),
            }
        }

        info!(
            "Cleanup scanned {} records, removed {} (older than {} days)",
            report.scanned, report.removed, max_age_days
        );
        report
    }

    // === Goals ===

    /// Stored goals, with defaults for anything missing or invalid.
    pub fn get_goals(&self) -> GoalSettings {
        let raw = match self.store.get(goals_key()) {
            Ok(Some(raw)) => raw,
            Ok(None) => return GoalSettings::default(),
            Err(e) => {
                warn!("Failed to read goals: {}", e);
                return GoalSettings::default();
            }
        };

        wire::decode_goals(&raw).unwrap_or_else(|e| {
            warn!("Ignoring corrupt goals: {}", e);
            GoalSettings::default()
        })
    }

    /// Validate and persist goal settings.
    pub fn set_goals(&self, goals: GoalSettings) -> Result<()> {
        goals.validate()?;
        let value = wire::encode_goals(&goals)?;
        self.store.set(goals_key(), &value)?;
        info!(
            "Goals set: water={}, calories={}",
            goals.water_goal, goals.calorie_goal
        );
        Ok(())
    }
}
