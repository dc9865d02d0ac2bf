//! In-memory TTL store with background eviction.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, instrument};

use pokedex_core::constants::DEFAULT_CACHE_INTERVAL_SECS;
use pokedex_core::error::{PokedexError, Result};

/// Stored payload with its insertion time.
#[derive(Clone, Debug)]
struct CacheEntry {
    payload: Bytes,
    created_at: Instant,
}

impl CacheEntry {
    fn is_stale(&self, now: Instant, interval: Duration) -> bool {
        now.saturating_duration_since(self.created_at) > interval
    }
}

/// Store configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Staleness threshold and sweep period
    pub interval: Duration,
    /// Entries to preallocate room for
    pub initial_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_CACHE_INTERVAL_SECS),
            initial_capacity: 64,
        }
    }
}

impl StoreConfig {
    /// Sets the staleness threshold and sweep period.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Sets the preallocated capacity.
    pub fn with_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Rejects configurations that cannot produce a working store.
    pub fn validate(&self) -> Result<()> {
        if self.interval.is_zero() {
            return Err(PokedexError::InvalidConfig(
                "cache interval must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// Store statistics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreStats {
    /// Entries currently held, stale or not
    pub total_entries: usize,
    /// Entries older than the interval that the sweep has not reached yet
    pub stale_entries: usize,
    /// Completed sweep passes
    pub sweeps: u64,
    /// Entries removed by sweeps
    pub evicted: u64,
    /// Staleness threshold and sweep period
    pub interval: Duration,
}

/// State shared between the store handle and its sweep task.
#[derive(Debug)]
struct Shared {
    entries: Mutex<HashMap<String, CacheEntry>>,
    interval: Duration,
    sweeps: AtomicU64,
    evicted: AtomicU64,
}

impl Shared {
    /// Keys older than the interval at the time of the scan.
    fn collect_stale(&self) -> Vec<String> {
        let now = Instant::now();
        self.entries
            .lock()
            .iter()
            .filter(|(_, entry)| entry.is_stale(now, self.interval))
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Removes `key` if it is still stale. Takes the lock for this key only.
    fn evict_if_stale(&self, key: &str) -> bool {
        let mut entries = self.entries.lock();
        // The key may have been overwritten or removed since the scan.
        let stale = entries
            .get(key)
            .is_some_and(|entry| entry.is_stale(Instant::now(), self.interval));
        if stale {
            entries.remove(key);
        }
        stale
    }

    fn sweep(&self) -> u64 {
        let mut evicted = 0;
        for key in self.collect_stale() {
            if self.evict_if_stale(&key) {
                debug!(key, "Evicted stale entry");
                evicted += 1;
            }
        }
        self.sweeps.fetch_add(1, Ordering::Relaxed);
        self.evicted.fetch_add(evicted, Ordering::Relaxed);
        evicted
    }
}

/// In-memory store mapping string keys to byte payloads.
///
/// Every entry is stamped with its insertion time. A background task wakes up
/// once per interval and removes entries older than the interval, so eviction
/// is eventual: [`get`](Self::get) may still return an entry that has gone
/// stale but has not been swept yet.
///
/// # Thread Safety
///
/// `add` and `get` are linearizable with each other through one mutex over the
/// entry map. The sweep takes that same mutex once for its scan and once per
/// removal, so callers are never blocked for a whole sweep.
///
/// # Lifecycle
///
/// The sweep task starts in the constructor and runs until [`stop`](Self::stop)
/// or [`shutdown`](Self::shutdown) is called or the store is dropped.
#[derive(Debug)]
pub struct TtlStore {
    shared: Arc<Shared>,
    shutdown: watch::Sender<bool>,
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl TtlStore {
    /// Creates an empty store and starts its sweep task.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(interval: Duration) -> Result<Self> {
        Self::with_config(StoreConfig::default().with_interval(interval))
    }

    /// Creates a store with custom configuration.
    pub fn with_config(config: StoreConfig) -> Result<Self> {
        config.validate()?;
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| PokedexError::RuntimeUnavailable)?;

        let shared = Arc::new(Shared {
            entries: Mutex::new(HashMap::with_capacity(config.initial_capacity)),
            interval: config.interval,
            sweeps: AtomicU64::new(0),
            evicted: AtomicU64::new(0),
        });

        let (shutdown, shutdown_rx) = watch::channel(false);
        // First tick one full interval after construction, not after first poll.
        let first_tick = Instant::now() + config.interval;
        let sweeper = runtime.spawn(sweep_loop(Arc::clone(&shared), first_tick, shutdown_rx));

        info!(interval = ?config.interval, "Cache sweep started");

        Ok(Self {
            shared,
            shutdown,
            sweeper: Mutex::new(Some(sweeper)),
        })
    }

    /// Inserts or overwrites the entry for `key`, resetting its age to zero.
    pub fn add(&self, key: impl Into<String>, payload: impl Into<Bytes>) {
        let entry = CacheEntry {
            payload: payload.into(),
            created_at: Instant::now(),
        };
        self.shared.entries.lock().insert(key.into(), entry);
    }

    /// Returns the payload stored under `key`, whatever its age.
    ///
    /// The returned `Bytes` is an immutable handle owned by the caller; later
    /// writes or evictions never change it.
    pub fn get(&self, key: &str) -> Option<Bytes> {
        self.shared
            .entries
            .lock()
            .get(key)
            .map(|entry| entry.payload.clone())
    }

    /// Returns the staleness threshold and sweep period.
    pub fn interval(&self) -> Duration {
        self.shared.interval
    }

    /// Returns the number of stored entries, including stale ones.
    pub fn len(&self) -> usize {
        self.shared.entries.lock().len()
    }

    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.shared.entries.lock().is_empty()
    }

    /// Returns store statistics.
    pub fn stats(&self) -> StoreStats {
        let now = Instant::now();
        let entries = self.shared.entries.lock();
        let stale = entries
            .values()
            .filter(|entry| entry.is_stale(now, self.shared.interval))
            .count();

        StoreStats {
            total_entries: entries.len(),
            stale_entries: stale,
            sweeps: self.shared.sweeps.load(Ordering::Relaxed),
            evicted: self.shared.evicted.load(Ordering::Relaxed),
            interval: self.shared.interval,
        }
    }

    /// Returns true while the sweep task is alive.
    pub fn is_running(&self) -> bool {
        self.sweeper
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Signals the sweep task to stop. Returns immediately.
    ///
    /// Entries already stored stay readable; they are simply no longer evicted.
    pub fn stop(&self) {
        self.shutdown.send_replace(true);
    }

    /// Stops the sweep task and waits for it to finish.
    #[instrument(skip(self))]
    pub async fn shutdown(&self) {
        self.stop();
        let handle = self.sweeper.lock().take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                debug!(error = %e, "Sweep task ended abnormally");
            }
        }
    }
}

async fn sweep_loop(shared: Arc<Shared>, first_tick: Instant, mut shutdown: watch::Receiver<bool>) {
    let mut ticker = time::interval_at(first_tick, shared.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let evicted = shared.sweep();
                if evicted > 0 {
                    debug!(evicted, "Sweep pass completed");
                }
            }
            changed = shutdown.changed() => {
                // A closed channel means the store handle was dropped.
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }

    info!("Cache sweep stopped");
}
