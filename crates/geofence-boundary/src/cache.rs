//! # Single-Flight Dataset Cache
//!
//! Holds at most one copy of a dataset and guarantees at most one load in
//! flight at any time.
//!
//! ## States
//!
//! ```text
//! Unloaded ──▶ Loading ──▶ Loaded (terminal for the process)
//!                 │
//!                 └──────▶ Failed ──▶ Loading (next caller retries)
//! ```
//!
//! ## Coalescing
//!
//! The first caller to find the slot `Unloaded` or `Failed` installs a
//! `watch` channel in the `Loading` state and spawns the load as its own
//! task. Callers that arrive while it runs subscribe to the same channel
//! and resume exactly when the result is published. Because the load runs
//! on a spawned task, a caller that abandons its call does not cancel the
//! load; the result still lands in the cache.
//!
//! The slot is swapped under a mutex with a fully built `Arc<T>`, so no
//! reader ever observes a partial dataset.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::BoundaryError;

type Outcome<T> = Result<Arc<T>, BoundaryError>;

/// Observable cache state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LoadState {
    /// No load has been attempted.
    Unloaded,
    /// A load is in flight.
    Loading,
    /// The dataset is cached.
    Loaded,
    /// The last load failed; the next request retries.
    Failed,
}

impl std::fmt::Display for LoadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Unloaded => "UNLOADED",
            Self::Loading => "LOADING",
            Self::Loaded => "LOADED",
            Self::Failed => "FAILED",
        };
        f.write_str(s)
    }
}

enum Slot<T> {
    Unloaded,
    Loading(watch::Receiver<Option<Outcome<T>>>),
    Loaded(Arc<T>),
    Failed(BoundaryError),
}

impl<T> Slot<T> {
    fn state(&self) -> LoadState {
        match self {
            Slot::Unloaded => LoadState::Unloaded,
            Slot::Loading(_) => LoadState::Loading,
            Slot::Loaded(_) => LoadState::Loaded,
            Slot::Failed(_) => LoadState::Failed,
        }
    }
}

/// Counters for one dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DatasetStats {
    /// Loads started (one per `Unloaded`/`Failed` → `Loading` transition).
    pub loads_started: u64,
    /// Loads that ended in failure.
    pub loads_failed: u64,
    /// Requests that attached to an in-flight load.
    pub coalesced_waits: u64,
    /// Requests answered straight from the cache.
    pub cache_hits: u64,
}

#[derive(Default)]
struct Counters {
    loads_started: AtomicU64,
    loads_failed: AtomicU64,
    coalesced_waits: AtomicU64,
    cache_hits: AtomicU64,
}

/// A lazily loaded, shared, single-flight dataset slot.
pub struct SingleFlight<T> {
    dataset: String,
    slot: Arc<Mutex<Slot<T>>>,
    counters: Arc<Counters>,
}

impl<T: Send + Sync + 'static> SingleFlight<T> {
    /// An empty slot for `dataset`.
    pub fn new(dataset: impl Into<String>) -> Self {
        Self {
            dataset: dataset.into(),
            slot: Arc::new(Mutex::new(Slot::Unloaded)),
            counters: Arc::new(Counters::default()),
        }
    }

    /// The dataset name this slot caches.
    pub fn dataset(&self) -> &str {
        &self.dataset
    }

    /// Current state.
    pub fn state(&self) -> LoadState {
        self.slot.lock().state()
    }

    /// The cached value, without waiting or triggering a load.
    pub fn peek(&self) -> Option<Arc<T>> {
        match &*self.slot.lock() {
            Slot::Loaded(value) => Some(Arc::clone(value)),
            _ => None,
        }
    }

    /// The error from the most recent failed load, if the slot is `Failed`.
    pub fn last_error(&self) -> Option<BoundaryError> {
        match &*self.slot.lock() {
            Slot::Failed(err) => Some(err.clone()),
            _ => None,
        }
    }

    /// Snapshot of the counters.
    pub fn stats(&self) -> DatasetStats {
        DatasetStats {
            loads_started: self.counters.loads_started.load(Ordering::Relaxed),
            loads_failed: self.counters.loads_failed.load(Ordering::Relaxed),
            coalesced_waits: self.counters.coalesced_waits.load(Ordering::Relaxed),
            cache_hits: self.counters.cache_hits.load(Ordering::Relaxed),
        }
    }

    /// Return the cached value, join an in-flight load, or start one.
    ///
    /// `load` is only invoked when this call starts a new load. The load
    /// runs on a spawned tokio task, so this must be called from within a
    /// tokio runtime.
    pub async fn get_or_load<F, Fut>(&self, load: F) -> Result<Arc<T>, BoundaryError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, BoundaryError>> + Send + 'static,
    {
        let mut rx = {
            let mut slot = self.slot.lock();
            match &*slot {
                Slot::Loaded(value) => {
                    self.counters.cache_hits.fetch_add(1, Ordering::Relaxed);
                    return Ok(Arc::clone(value));
                }
                Slot::Loading(rx) => {
                    self.counters.coalesced_waits.fetch_add(1, Ordering::Relaxed);
                    debug!(dataset = %self.dataset, "Joining in-flight boundary load");
                    rx.clone()
                }
                Slot::Unloaded | Slot::Failed(_) => {
                    let previous = slot.state();
                    let (tx, rx) = watch::channel(None);
                    *slot = Slot::Loading(rx.clone());
                    self.counters.loads_started.fetch_add(1, Ordering::Relaxed);
                    debug!(dataset = %self.dataset, from = %previous, "Starting boundary load");
                    self.spawn_load(tx, load());
                    rx
                }
            }
        };

        let published = match rx.wait_for(Option::is_some).await {
            Ok(outcome) => (*outcome).clone(),
            Err(_) => None,
        };
        match published {
            Some(result) => result,
            None => Err(self.abandon(&rx)),
        }
    }

    fn spawn_load<Fut>(&self, tx: watch::Sender<Option<Outcome<T>>>, fut: Fut)
    where
        Fut: Future<Output = Result<T, BoundaryError>> + Send + 'static,
    {
        let dataset = self.dataset.clone();
        let slot = Arc::clone(&self.slot);
        let counters = Arc::clone(&self.counters);

        tokio::spawn(async move {
            let started = Instant::now();
            let outcome: Outcome<T> = match tokio::spawn(fut).await {
                Ok(Ok(value)) => Ok(Arc::new(value)),
                Ok(Err(err)) => Err(err),
                Err(join) => Err(BoundaryError::aborted(&dataset, format!("load task failed: {join}"))),
            };
            let elapsed_ms = started.elapsed().as_millis() as u64;

            {
                let mut slot = slot.lock();
                *slot = match &outcome {
                    Ok(value) => Slot::Loaded(Arc::clone(value)),
                    Err(err) => Slot::Failed(err.clone()),
                };
            }

            match &outcome {
                Ok(_) => info!(dataset = %dataset, elapsed_ms, "Boundary dataset loaded"),
                Err(err) => {
                    counters.loads_failed.fetch_add(1, Ordering::Relaxed);
                    warn!(dataset = %dataset, elapsed_ms, error = %err, "Boundary dataset load failed");
                }
            }

            // Waiters may all have gone away; the cache is already updated.
            let _ = tx.send(Some(outcome));
        });
    }

    /// The publishing task vanished (runtime shutdown). Move the slot to
    /// `Failed` so the next caller can retry instead of waiting forever.
    fn abandon(&self, rx: &watch::Receiver<Option<Outcome<T>>>) -> BoundaryError {
        let err = BoundaryError::aborted(&self.dataset, "load task dropped before publishing");
        let mut slot = self.slot.lock();
        if let Slot::Loading(current) = &*slot {
            if current.same_channel(rx) {
                *slot = Slot::Failed(err.clone());
            }
        }
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    fn counting_loader(
        calls: &Arc<AtomicUsize>,
        delay_ms: u64,
        value: u32,
    ) -> impl FnOnce() -> std::pin::Pin<Box<dyn Future<Output = Result<u32, BoundaryError>> + Send>> {
        let calls = Arc::clone(calls);
        move || {
            Box::pin(async move {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                Ok(value)
            })
        }
    }

    // ── State transitions ────────────────────────────────────────────

    #[tokio::test]
    async fn test_unloaded_to_loaded() {
        let cache = SingleFlight::<u32>::new("national");
        assert_eq!(cache.state(), LoadState::Unloaded);
        assert!(cache.peek().is_none());

        let calls = Arc::new(AtomicUsize::new(0));
        let v = cache.get_or_load(counting_loader(&calls, 0, 7)).await.unwrap();
        assert_eq!(*v, 7);
        assert_eq!(cache.state(), LoadState::Loaded);
        assert_eq!(cache.peek().as_deref(), Some(&7));
    }

    #[tokio::test]
    async fn test_loaded_value_is_reused() {
        let cache = SingleFlight::<u32>::new("national");
        let calls = Arc::new(AtomicUsize::new(0));
        cache.get_or_load(counting_loader(&calls, 0, 1)).await.unwrap();
        let second = cache.get_or_load(counting_loader(&calls, 0, 2)).await.unwrap();
        assert_eq!(*second, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.stats().cache_hits, 1);
    }

    #[tokio::test]
    async fn test_failure_then_retry() {
        let cache = SingleFlight::<u32>::new("regions");
        let err = cache
            .get_or_load(|| async { Err::<u32, _>(BoundaryError::fetch("regions", "offline")) })
            .await
            .unwrap_err();
        assert_eq!(err.dataset(), "regions");
        assert_eq!(cache.state(), LoadState::Failed);
        assert!(cache.last_error().is_some());

        let calls = Arc::new(AtomicUsize::new(0));
        let v = cache.get_or_load(counting_loader(&calls, 0, 3)).await.unwrap();
        assert_eq!(*v, 3);
        assert_eq!(cache.state(), LoadState::Loaded);

        let stats = cache.stats();
        assert_eq!(stats.loads_started, 2);
        assert_eq!(stats.loads_failed, 1);
    }

    #[tokio::test]
    async fn test_panicking_loader_reports_aborted() {
        let cache = SingleFlight::<u32>::new("national");
        let err = cache
            .get_or_load(|| async {
                if true {
                    panic!("corrupt geometry");
                }
                Ok::<u32, BoundaryError>(0)
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), crate::error::FailureKind::Aborted);
        assert_eq!(cache.state(), LoadState::Failed);
    }

    // ── Concurrency ──────────────────────────────────────────────────

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_callers_share_one_load() {
        let cache = Arc::new(SingleFlight::<u32>::new("national"));
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..16 {
            let cache = Arc::clone(&cache);
            let calls = Arc::clone(&calls);
            handles.push(tokio::spawn(async move {
                cache.get_or_load(counting_loader(&calls, 50, 42)).await
            }));
        }
        for handle in handles {
            assert_eq!(*handle.await.unwrap().unwrap(), 42);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let stats = cache.stats();
        assert_eq!(stats.loads_started, 1);
        assert_eq!(stats.coalesced_waits + stats.cache_hits, 15);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_callers_share_one_failure() {
        let cache = Arc::new(SingleFlight::<u32>::new("regions"));
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..10 {
            let cache = Arc::clone(&cache);
            let calls = Arc::clone(&calls);
            handles.push(tokio::spawn(async move {
                cache
                    .get_or_load(move || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        Err::<u32, _>(BoundaryError::fetch("regions", "503"))
                    })
                    .await
            }));
        }
        let mut failures = 0;
        for handle in handles {
            if handle.await.unwrap().is_err() {
                failures += 1;
            }
        }
        assert_eq!(failures, 10);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_abandoned_caller_does_not_cancel_load() {
        let cache = Arc::new(SingleFlight::<u32>::new("national"));
        let calls = Arc::new(AtomicUsize::new(0));

        let caller = {
            let cache = Arc::clone(&cache);
            let loader = counting_loader(&calls, 50, 9);
            tokio::spawn(async move { cache.get_or_load(loader).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        caller.abort();
        assert_eq!(cache.state(), LoadState::Loading);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(cache.state(), LoadState::Loaded);
        assert_eq!(cache.peek().as_deref(), Some(&9));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
