//! Query cache that coalesces fetches per key and serves stale data while
//! revalidating.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use super::traits::{EntryStatus, QueryKey, Snapshot};

/// Default freshness window
pub const DEFAULT_STALE_TIME: Duration = Duration::from_secs(5 * 60);

struct Entry<T, E> {
  data: Option<T>,
  fetched_at: Option<Instant>,
  status: EntryStatus,
  error: Option<E>,
  /// Id of the fetch allowed to write its result into this entry
  fetch_id: u64,
  /// Set when the entry is invalidated while a fetch is in flight
  invalidated_in_flight: bool,
}

impl<T: Clone, E: Clone> Entry<T, E> {
  fn empty() -> Self {
    Self {
      data: None,
      fetched_at: None,
      status: EntryStatus::Stale,
      error: None,
      fetch_id: 0,
      invalidated_in_flight: false,
    }
  }

  /// Stored status with the freshness window applied.
  fn status_at(&self, now: Instant, stale_time: Duration) -> EntryStatus {
    match (self.status, self.fetched_at) {
      (EntryStatus::Fresh, Some(at)) if now.duration_since(at) >= stale_time => EntryStatus::Stale,
      (status, _) => status,
    }
  }

  fn snapshot(&self, now: Instant, stale_time: Duration) -> Snapshot<T, E> {
    Snapshot {
      data: self.data.clone(),
      status: Some(self.status_at(now, stale_time)),
      error: self.error.clone(),
    }
  }

  fn invalidate(&mut self) {
    match self.status {
      EntryStatus::Fresh => self.status = EntryStatus::Stale,
      EntryStatus::Pending => self.invalidated_in_flight = true,
      EntryStatus::Stale | EntryStatus::Error => {}
    }
  }
}

/// Keyed cache of in-flight and completed fetches.
///
/// At most one current fetch runs per key: requests for a key that is already
/// being fetched wait for that fetch instead of starting another. Completed data
/// stays fresh for `stale_time`, after which the next request refetches while
/// the old data stays readable.
///
/// Cloning is cheap and shares the same entries. Fetches are spawned on the
/// tokio runtime, so requests must be made from within one.
pub struct QueryCache<K, T, E> {
  entries: Arc<Mutex<HashMap<K, Entry<T, E>>>>,
  next_fetch: Arc<AtomicU64>,
  /// How long before cached data is considered stale
  stale_time: Duration,
}

impl<K, T, E> QueryCache<K, T, E>
where
  K: QueryKey,
  T: Clone + Send + 'static,
  E: Clone + Send + 'static,
{
  pub fn new() -> Self {
    Self {
      entries: Arc::new(Mutex::new(HashMap::new())),
      next_fetch: Arc::new(AtomicU64::new(1)),
      stale_time: DEFAULT_STALE_TIME,
    }
  }

  /// Set the freshness window.
  pub fn with_stale_time(mut self, stale_time: Duration) -> Self {
    self.stale_time = stale_time;
    self
  }

  fn lock(&self) -> MutexGuard<'_, HashMap<K, Entry<T, E>>> {
    // Entries are only replaced field by field, a poisoned map is still consistent
    self.entries.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Cache-first request that never blocks.
  ///
  /// 1. Fresh entry - nothing happens, `fetcher` is not called
  /// 2. Fetch in flight - it is shared, unless the entry was invalidated
  ///    after it started; then a new fetch takes over the entry and the old
  ///    result is dropped when it arrives
  /// 3. Missing, stale or failed - `fetcher` is spawned on the runtime
  ///
  /// Returns whatever the entry holds right now, so callers can keep showing
  /// the last known data while the new result is on its way. Failures are
  /// recorded on the entry; previously fetched data stays readable.
  pub fn request<F, Fut>(&self, key: &K, fetcher: F) -> Snapshot<T, E>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
  {
    let now = Instant::now();
    let mut entries = self.lock();
    let entry = entries.entry(key.clone()).or_insert_with(Entry::empty);

    let current = match entry.status_at(now, self.stale_time) {
      EntryStatus::Fresh => entry.data.is_some(),
      // A fetch started before an invalidation may miss the write behind it
      EntryStatus::Pending => !entry.invalidated_in_flight,
      EntryStatus::Stale | EntryStatus::Error => false,
    };
    if !current {
      self.start(key, entry, fetcher());
    }

    entry.snapshot(now, self.stale_time)
  }

  /// Current state of an entry without triggering a fetch.
  pub fn snapshot(&self, key: &K) -> Snapshot<T, E> {
    let now = Instant::now();
    self
      .lock()
      .get(key)
      .map(|entry| entry.snapshot(now, self.stale_time))
      .unwrap_or_else(Snapshot::absent)
  }

  /// Mark a single entry stale. Returns whether the key was cached.
  pub fn invalidate(&self, key: &K) -> bool {
    match self.lock().get_mut(key) {
      Some(entry) => {
        entry.invalidate();
        debug!("Invalidated {}", key.description());
        true
      }
      None => false,
    }
  }

  /// Mark every entry of a key family stale. Returns how many matched.
  pub fn invalidate_family(&self, family: &str) -> usize {
    let mut entries = self.lock();
    let mut count = 0;
    for (key, entry) in entries.iter_mut() {
      if key.family() == family {
        entry.invalidate();
        count += 1;
      }
    }
    debug!(family, count, "Invalidated cache family");
    count
  }

  /// Drop every entry. Fetches still in flight complete without writing.
  pub fn clear(&self) {
    self.lock().clear();
  }

  pub fn len(&self) -> usize {
    self.lock().len()
  }

  pub fn is_empty(&self) -> bool {
    self.lock().is_empty()
  }

  /// Spawn `future` as the fetch that owns `entry` from now on.
  fn start<Fut>(&self, key: &K, entry: &mut Entry<T, E>, future: Fut)
  where
    Fut: Future<Output = Result<T, E>> + Send + 'static,
  {
    let fetch_id = self.next_fetch.fetch_add(1, Ordering::Relaxed);
    let cache = self.clone();
    let task_key = key.clone();

    debug!(fetch_id, "Fetching {}", key.description());
    entry.status = EntryStatus::Pending;
    entry.fetch_id = fetch_id;
    entry.invalidated_in_flight = false;
    // The task only takes the lock once the fetch resolves
    tokio::spawn(async move {
      let result = future.await;
      cache.complete(&task_key, fetch_id, result);
    });
  }

  fn complete(&self, key: &K, fetch_id: u64, result: Result<T, E>) {
    let mut entries = self.lock();
    let Some(entry) = entries.get_mut(key) else {
      return;
    };
    if entry.fetch_id != fetch_id {
      return;
    }

    match result {
      Ok(data) => {
        entry.data = Some(data);
        entry.fetched_at = Some(Instant::now());
        entry.error = None;
        entry.status = if entry.invalidated_in_flight {
          EntryStatus::Stale
        } else {
          EntryStatus::Fresh
        };
        debug!(fetch_id, "Cached {}", key.description());
      }
      Err(e) => {
        entry.error = Some(e);
        entry.status = EntryStatus::Error;
        debug!(fetch_id, "Fetch failed for {}", key.description());
      }
    }
    entry.invalidated_in_flight = false;
  }
}

impl<K, T, E> Default for QueryCache<K, T, E>
where
  K: QueryKey,
  T: Clone + Send + 'static,
  E: Clone + Send + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}

impl<K, T, E> Clone for QueryCache<K, T, E> {
  fn clone(&self) -> Self {
    Self {
      entries: Arc::clone(&self.entries),
      next_fetch: Arc::clone(&self.next_fetch),
      stale_time: self.stale_time,
    }
  }
}
