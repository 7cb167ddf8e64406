//! Expiry watchdog.
//!
//! A background task re-checks today's record on a fixed interval and, once
//! it is 24 hours old, removes it and notifies the caller so in-memory
//! counters can be zeroed.
//!
//! Cancellation is synchronous: when [`WatchHandle::cancel`] returns, the
//! callback has been dropped and cannot run again, even if a check was in
//! progress on another thread.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::backend::RecordStore;
use crate::clock::Clock;
use crate::daily::DailyRecordStore;
use crate::error::{Error, Result};

/// Default time between expiry checks.
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(60 * 60);

type ExpireCallback = Box<dyn FnMut() + Send>;

/// Options for the expiry watchdog.
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Time between checks. The first check runs one interval after start.
    /// Default: 60 minutes.
    pub interval: Duration,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            interval: DEFAULT_CHECK_INTERVAL,
        }
    }
}

impl WatchOptions {
    /// Create a new builder for WatchOptions.
    pub fn builder() -> WatchOptionsBuilder {
        WatchOptionsBuilder::default()
    }

    /// Create options with a specific interval.
    pub fn with_interval(interval: Duration) -> Self {
        Self { interval }
    }

    /// Validate the options.
    pub fn validate(&self) -> Result<()> {
        if self.interval.is_zero() {
            return Err(Error::InvalidConfig("interval must be > 0".to_string()));
        }
        Ok(())
    }
}

/// Builder for WatchOptions.
#[derive(Debug, Clone, Default)]
pub struct WatchOptionsBuilder {
    options: WatchOptions,
}

impl WatchOptionsBuilder {
    /// Set the check interval.
    #[must_use]
    pub fn interval(mut self, interval: Duration) -> Self {
        self.options.interval = interval;
        self
    }

    /// Set the check interval in whole minutes.
    #[must_use]
    pub fn interval_minutes(self, minutes: u64) -> Self {
        self.interval(Duration::from_secs(minutes.saturating_mul(60)))
    }

    /// Build the WatchOptions.
    #[must_use]
    pub fn build(self) -> WatchOptions {
        self.options
    }
}

/// Handle to a running expiry watchdog.
///
/// Dropping the handle cancels the watchdog.
pub struct WatchHandle {
    cancel_token: CancellationToken,
    callback: Arc<Mutex<Option<ExpireCallback>>>,
    handle: JoinHandle<()>,
}

fn lock_slot(slot: &Mutex<Option<ExpireCallback>>) -> MutexGuard<'_, Option<ExpireCallback>> {
    slot.lock().unwrap_or_else(|e| e.into_inner())
}

impl WatchHandle {
    /// Stop all future checks and release the callback.
    ///
    /// Blocks until any in-progress check has finished. Must not be called
    /// from inside the callback itself.
    pub fn cancel(&self) {
        self.cancel_token.cancel();
        lock_slot(&self.callback).take();
    }

    /// Whether the background task is still running.
    pub fn is_active(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Whether [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Start the watchdog with default options (hourly checks).
///
/// Must be called from within a tokio runtime.
pub fn start_expiry_watch<S, C, F>(
    records: Arc<DailyRecordStore<S, C>>,
    on_expire: F,
) -> WatchHandle
where
    S: RecordStore + 'static,
    C: Clock + 'static,
    F: FnMut() + Send + 'static,
{
    spawn_watch(records, WatchOptions::default(), Box::new(on_expire))
}

/// Start the watchdog with custom options.
///
/// Must be called from within a tokio runtime.
pub fn start_expiry_watch_with<S, C, F>(
    records: Arc<DailyRecordStore<S, C>>,
    options: WatchOptions,
    on_expire: F,
) -> Result<WatchHandle>
where
    S: RecordStore + 'static,
    C: Clock + 'static,
    F: FnMut() + Send + 'static,
{
    options.validate()?;
    Ok(spawn_watch(records, options, Box::new(on_expire)))
}

fn spawn_watch<S, C>(
    records: Arc<DailyRecordStore<S, C>>,
    options: WatchOptions,
    on_expire: ExpireCallback,
) -> WatchHandle
where
    S: RecordStore + 'static,
    C: Clock + 'static,
{
    let cancel_token = CancellationToken::new();
    let task_token = cancel_token.clone();
    let callback = Arc::new(Mutex::new(Some(on_expire)));
    let task_callback = Arc::clone(&callback);
    let period = options.interval;

    let handle = tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = task_token.cancelled() => {
                    debug!("Expiry watch cancelled, stopping");
                    break;
                }
                _ = ticker.tick() => {
                    let mut slot = lock_slot(&task_callback);
                    let Some(on_expire) = slot.as_mut() else {
                        break;
                    };
                    if task_token.is_cancelled() {
                        break;
                    }
                    if records.expire_today_if_stale() {
                        on_expire();
                    }
                }
            }
        }
    });

    debug!("Expiry watch started, checking every {:?}", period);
    WatchHandle {
        cancel_token,
        callback,
        handle,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Barrier;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use super::*;
    use crate::backend::MemoryStore;
    use crate::clock::ManualClock;
    use crate::keys::date_key;
    use hydra_types::wire::encode_record;
    use hydra_types::{DailyRecord, Intake};
    use time::OffsetDateTime;
    use time::macros::datetime;

    type Fixture = (
        Arc<DailyRecordStore<Arc<MemoryStore>, Arc<ManualClock>>>,
        Arc<MemoryStore>,
        Arc<ManualClock>,
    );

    /// 22.5 hours before the fixture's start.
    const NEARLY_STALE: OffsetDateTime = datetime!(2026-10-17 02:00:00 UTC);
    /// 24.5 hours before the fixture's start.
    const STALE: OffsetDateTime = datetime!(2026-10-17 00:00:00 UTC);

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(datetime!(2026-10-18 00:30:00 UTC)));
        let records = Arc::new(DailyRecordStore::new(
            Arc::clone(&store),
            Arc::clone(&clock),
        ));
        (records, store, clock)
    }

    /// Store a record under today's key that was last written at `written`.
    fn plant(store: &MemoryStore, clock: &ManualClock, written: OffsetDateTime) {
        let record = DailyRecord::new(Intake::new(4, 800), written);
        store
            .set(&date_key(clock.now()), &encode_record(&record).unwrap())
            .unwrap();
    }

    fn counter() -> (Arc<AtomicUsize>, impl FnMut() + Send + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let hits = Arc::clone(&count);
        (count, move || {
            hits.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_watch_options_default() {
        let opts = WatchOptions::default();
        assert_eq!(opts.interval, Duration::from_secs(3600));
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_watch_options_builder() {
        let opts = WatchOptions::builder().interval_minutes(15).build();
        assert_eq!(opts.interval, Duration::from_secs(900));
    }

    #[test]
    fn test_watch_options_rejects_zero_interval() {
        let opts = WatchOptions::with_interval(Duration::ZERO);
        assert!(matches!(opts.validate(), Err(Error::InvalidConfig(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_once_record_expires() {
        let (records, store, clock) = fixture();
        plant(&store, &clock, NEARLY_STALE);
        let (count, on_expire) = counter();

        let handle = start_expiry_watch(Arc::clone(&records), on_expire);

        // First hourly check: record is 22.5h old
        tokio::time::sleep(Duration::from_secs(61 * 60)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(store.len(), 1);

        clock.advance(time::Duration::hours(2));
        tokio::time::sleep(Duration::from_secs(60 * 60)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(store.is_empty());

        // Nothing left to expire
        tokio::time::sleep(Duration::from_secs(60 * 60)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(handle.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fresh_record_is_kept() {
        let (records, store, _) = fixture();
        records.save_today(1, 1).unwrap();
        let (count, on_expire) = counter();

        let _handle = start_expiry_watch(Arc::clone(&records), on_expire);
        tokio::time::sleep(Duration::from_secs(3 * 60 * 60 + 60)).await;

        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_check_before_first_interval() {
        let (records, store, clock) = fixture();
        plant(&store, &clock, STALE);
        let (count, on_expire) = counter();

        let _handle = start_expiry_watch(Arc::clone(&records), on_expire);
        tokio::time::sleep(Duration::from_secs(59 * 60)).await;

        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_callback_after_cancel() {
        let (records, store, clock) = fixture();
        plant(&store, &clock, NEARLY_STALE);
        let (count, on_expire) = counter();

        let handle = start_expiry_watch(Arc::clone(&records), on_expire);
        handle.cancel();
        assert!(handle.is_cancelled());

        clock.advance(time::Duration::hours(2));
        tokio::time::sleep(Duration::from_secs(3 * 60 * 60)).await;

        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(store.len(), 1);
        assert!(!handle.is_active());
    }

    /// Backend whose first `get` parks until the test releases it.
    struct GatedStore {
        inner: MemoryStore,
        armed: AtomicBool,
        entered: Barrier,
        release: Barrier,
    }

    impl RecordStore for GatedStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            if self.armed.swap(false, Ordering::SeqCst) {
                self.entered.wait();
                self.release.wait();
            }
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<()> {
            self.inner.remove(key)
        }

        fn keys(&self) -> Result<Vec<String>> {
            self.inner.keys()
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_cancel_waits_for_check_in_progress() {
        let clock = Arc::new(ManualClock::new(datetime!(2026-10-18 00:30:00 UTC)));
        let store = Arc::new(GatedStore {
            inner: MemoryStore::new(),
            armed: AtomicBool::new(true),
            entered: Barrier::new(2),
            release: Barrier::new(2),
        });
        plant(&store.inner, &clock, STALE);
        let records = Arc::new(DailyRecordStore::new(
            Arc::clone(&store),
            Arc::clone(&clock),
        ));
        let (count, on_expire) = counter();

        let options = WatchOptions::with_interval(Duration::from_millis(20));
        let handle = start_expiry_watch_with(records, options, on_expire).unwrap();

        // The first check is now parked inside the backend read
        let gate = Arc::clone(&store);
        tokio::task::spawn_blocking(move || gate.entered.wait())
            .await
            .unwrap();

        let returned = Arc::new(AtomicBool::new(false));
        let canceller = {
            let returned = Arc::clone(&returned);
            std::thread::spawn(move || {
                handle.cancel();
                returned.store(true, Ordering::SeqCst);
                handle
            })
        };

        std::thread::sleep(Duration::from_millis(50));
        assert!(!returned.load(Ordering::SeqCst));
        assert_eq!(count.load(Ordering::SeqCst), 0);

        let gate = Arc::clone(&store);
        tokio::task::spawn_blocking(move || gate.release.wait())
            .await
            .unwrap();
        let handle = canceller.join().unwrap();
        assert!(returned.load(Ordering::SeqCst));
        assert!(handle.is_cancelled());

        // The check that was already running finished before cancel returned
        let after_cancel = count.load(Ordering::SeqCst);
        assert_eq!(after_cancel, 1);
        assert!(store.inner.is_empty());

        plant(&store.inner, &clock, STALE);
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(count.load(Ordering::SeqCst), after_cancel);
        assert_eq!(store.inner.len(), 1);
        assert!(!handle.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels() {
        let (records, store, clock) = fixture();
        plant(&store, &clock, STALE);
        let (count, on_expire) = counter();

        drop(start_expiry_watch(Arc::clone(&records), on_expire));

        tokio::time::sleep(Duration::from_secs(2 * 60 * 60)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_interval() {
        let (records, store, clock) = fixture();
        plant(&store, &clock, STALE);
        let (count, on_expire) = counter();

        let options = WatchOptions::builder().interval_minutes(5).build();
        let _handle =
            start_expiry_watch_with(Arc::clone(&records), options, on_expire).unwrap();
        tokio::time::sleep(Duration::from_secs(6 * 60)).await;

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_options_rejected() {
        let (records, _, _) = fixture();
        let (_, on_expire) = counter();
        let result = start_expiry_watch_with(
            records,
            WatchOptions::with_interval(Duration::ZERO),
            on_expire,
        );
        assert!(result.is_err());
    }
}
