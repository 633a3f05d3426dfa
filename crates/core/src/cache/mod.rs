//! In-memory snapshot cache refreshed from the upstream sources.
//!
//! The cache holds one [`Snapshot`] and its expiry. Readers take a shared
//! lock and clone the `Arc`; a successful refresh takes the exclusive lock
//! only to swap the pointer and expiry, never while fetching.
//!
//! - Fresh reads never touch the network
//! - A refresh that fails leaves the previous snapshot and expiry untouched
//! - Under [`RefreshPolicy::SingleFlight`] concurrent callers share one
//!   in-flight refresh, which runs as its own task so an abandoned caller
//!   cannot cancel it for the others

mod source;

pub use source::DataSource;

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock, broadcast};
use tokio::time::Instant;

use crate::Error;
use crate::snapshot::Snapshot;
use source::fetch_snapshot;

/// How concurrent callers that observe an expired snapshot are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshPolicy {
    /// Callers share one in-flight refresh.
    #[default]
    SingleFlight,
    /// Every caller runs its own refresh; the last one to finish wins the swap.
    Independent,
}

type RefreshOutcome = Result<Arc<Snapshot>, Error>;

#[derive(Default)]
struct CacheState {
    snapshot: Option<Arc<Snapshot>>,
    expires_at: Option<Instant>,
}

impl CacheState {
    fn fresh(&self, now: Instant) -> Option<Arc<Snapshot>> {
        match (&self.snapshot, self.expires_at) {
            (Some(snapshot), Some(expires_at)) if now < expires_at => Some(Arc::clone(snapshot)),
            _ => None,
        }
    }
}

#[derive(Default)]
struct Counters {
    refreshes: AtomicU64,
    failed_refreshes: AtomicU64,
    coalesced: AtomicU64,
}

struct Inner<S> {
    source: S,
    interval: Duration,
    policy: RefreshPolicy,
    state: RwLock<CacheState>,
    in_flight: Mutex<Option<broadcast::Sender<RefreshOutcome>>>,
    counters: Counters,
}

/// Point-in-time view of the cache for diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatus {
    /// When the current snapshot was fetched.
    pub fetched_at: Option<DateTime<Utc>>,
    /// Time left before the next read triggers a refresh; zero when stale.
    pub expires_in: Option<Duration>,
    pub artists: usize,
    pub refreshes: u64,
    pub failed_refreshes: u64,
    /// Callers that joined a refresh already in flight.
    pub coalesced: u64,
    pub policy: RefreshPolicy,
}

/// Snapshot cache with concurrent multi-source refresh.
///
/// Cheap to clone; clones share the same snapshot.
pub struct SnapshotCache<S> {
    inner: Arc<Inner<S>>,
}

impl<S> Clone for SnapshotCache<S> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<S: DataSource> SnapshotCache<S> {
    /// Create an empty cache with the default single-flight policy.
    ///
    /// The first `get()` performs the initial fetch.
    pub fn new(source: S, interval: Duration) -> Self {
        Self::with_policy(source, interval, RefreshPolicy::default())
    }

    pub fn with_policy(source: S, interval: Duration, policy: RefreshPolicy) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                interval,
                policy,
                state: RwLock::new(CacheState::default()),
                in_flight: Mutex::new(None),
                counters: Counters::default(),
            }),
        }
    }

    pub fn interval(&self) -> Duration {
        self.inner.interval
    }

    pub fn policy(&self) -> RefreshPolicy {
        self.inner.policy
    }

    pub fn source(&self) -> &S {
        &self.inner.source
    }

    /// Return the current snapshot, refreshing first if it has expired.
    ///
    /// # Errors
    ///
    /// Returns `Error::UpstreamFetch` when the refresh this call triggered (or
    /// joined) failed. The previously cached snapshot stays in place and is
    /// still reachable through [`SnapshotCache::latest`].
    pub async fn get(&self) -> Result<Arc<Snapshot>, Error> {
        if let Some(snapshot) = self.inner.state.read().await.fresh(Instant::now()) {
            tracing::debug!("snapshot cache hit");
            return Ok(snapshot);
        }

        match self.inner.policy {
            RefreshPolicy::SingleFlight => self.refresh_shared(true).await,
            RefreshPolicy::Independent => self.inner.refresh_now().await,
        }
    }

    /// Refresh regardless of expiry.
    ///
    /// Under single-flight a refresh already in flight is joined rather than
    /// duplicated.
    pub async fn refresh(&self) -> Result<Arc<Snapshot>, Error> {
        match self.inner.policy {
            RefreshPolicy::SingleFlight => self.refresh_shared(false).await,
            RefreshPolicy::Independent => self.inner.refresh_now().await,
        }
    }

    /// The last successfully fetched snapshot, even if expired.
    pub async fn latest(&self) -> Option<Arc<Snapshot>> {
        self.inner.state.read().await.snapshot.clone()
    }

    pub async fn status(&self) -> CacheStatus {
        let state = self.inner.state.read().await;
        let now = Instant::now();
        let counters = &self.inner.counters;

        CacheStatus {
            fetched_at: state.snapshot.as_ref().map(|s| s.fetched_at()),
            expires_in: state.expires_at.map(|at| at.saturating_duration_since(now)),
            artists: state.snapshot.as_ref().map(|s| s.len()).unwrap_or(0),
            refreshes: counters.refreshes.load(Ordering::Relaxed),
            failed_refreshes: counters.failed_refreshes.load(Ordering::Relaxed),
            coalesced: counters.coalesced.load(Ordering::Relaxed),
            policy: self.inner.policy,
        }
    }

    /// Join the in-flight refresh, or start one.
    ///
    /// With `reuse_fresh`, a snapshot that became fresh while this caller
    /// waited for the in-flight slot is returned instead of fetching again.
    async fn refresh_shared(&self, reuse_fresh: bool) -> Result<Arc<Snapshot>, Error> {
        let mut rx = {
            let mut in_flight = self.inner.in_flight.lock().await;
            match in_flight.as_ref() {
                Some(tx) => {
                    let coalesced = self.inner.counters.coalesced.fetch_add(1, Ordering::Relaxed) + 1;
                    tracing::debug!(coalesced, "joining in-flight snapshot refresh");
                    tx.subscribe()
                }
                None => {
                    if reuse_fresh && let Some(snapshot) = self.inner.state.read().await.fresh(Instant::now()) {
                        return Ok(snapshot);
                    }

                    let (tx, rx) = broadcast::channel(1);
                    *in_flight = Some(tx);

                    let inner = Arc::clone(&self.inner);
                    tokio::spawn(async move {
                        let outcome = match AssertUnwindSafe(inner.refresh_now()).catch_unwind().await {
                            Ok(outcome) => outcome,
                            Err(_) => Err(Error::RefreshAborted("refresh task panicked".into())),
                        };
                        // NOTE: Clear the slot before publishing so late callers
                        // see either the in-flight sender or the swapped snapshot.
                        if let Some(tx) = inner.in_flight.lock().await.take() {
                            let _ = tx.send(outcome);
                        }
                    });
                    rx
                }
            }
        };

        rx.recv()
            .await
            .unwrap_or_else(|e| Err(Error::RefreshAborted(format!("refresh result lost: {e}"))))
    }
}

impl<S: DataSource> Inner<S> {
    async fn refresh_now(&self) -> Result<Arc<Snapshot>, Error> {
        let started = Instant::now();
        tracing::info!(policy = ?self.policy, "refreshing snapshot from upstream");

        match fetch_snapshot(&self.source).await {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                {
                    let mut state = self.state.write().await;
                    state.snapshot = Some(Arc::clone(&snapshot));
                    state.expires_at = Some(Instant::now() + self.interval);
                }
                self.counters.refreshes.fetch_add(1, Ordering::Relaxed);
                tracing::info!(
                    artists = snapshot.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "snapshot refreshed"
                );
                Ok(snapshot)
            }
            Err(err) => {
                self.counters.failed_refreshes.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(error = %err, "snapshot refresh failed; keeping previous snapshot");
                Err(err)
            }
        }
    }
}
