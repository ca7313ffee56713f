//! Two-tier cache of analysis results keyed by URL.
//!
//! The transient tier is an in-process map and is authoritative for the
//! lifetime of the process. The persistent tier is any [`KeyValueStore`];
//! every failure there is logged and absorbed, so callers only ever see a
//! hit, a miss, or a [`PutOutcome`].

pub mod clock;
pub mod entry;
pub mod errors;
pub mod key;
pub mod postgres;
pub mod store;
pub mod sweeper;

pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::{CacheEntry, ExpiryPolicy};
pub use errors::StorageError;
pub use key::{CACHE_PREFIX, RECENT_KEY, cache_key, url_from_key};
pub use postgres::PgStore;
pub use store::{KeyValueStore, MemoryStore};
pub use sweeper::spawn_sweeper;

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::entities::{AnalysisResult, RecentAnalysis};

/// Cap on the recent analyses list.
pub const MAX_RECENT: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PutOutcome {
    /// Both tiers and the recent list were written.
    Written,
    /// The transient tier holds the entry but a durable write failed.
    WrittenDegraded(String),
}

impl PutOutcome {
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::WrittenDegraded(_))
    }

    pub fn degraded_reason(&self) -> Option<&str> {
        match self {
            Self::Written => None,
            Self::WrittenDegraded(reason) => Some(reason),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CleanupReport {
    pub memory_removed: usize,
    pub persistent_removed: usize,
}

impl CleanupReport {
    pub fn total(&self) -> usize {
        self.memory_removed + self.persistent_removed
    }
}

#[derive(Debug, Default)]
struct RecentState {
    // None until the stored list has been read successfully
    loaded: Option<Vec<RecentAnalysis>>,
    // summaries recorded before the stored list could be read, newest first
    pending: Vec<RecentAnalysis>,
}

pub struct AnalysisCache {
    store: Arc<dyn KeyValueStore>,
    memory: DashMap<String, CacheEntry>,
    recent: Mutex<RecentState>,
    policy: ExpiryPolicy,
    clock: Arc<dyn Clock>,
}

impl AnalysisCache {
    pub fn new(store: Arc<dyn KeyValueStore>, policy: ExpiryPolicy) -> Self {
        Self::with_clock(store, policy, Arc::new(SystemClock))
    }

    pub fn with_clock(
        store: Arc<dyn KeyValueStore>,
        policy: ExpiryPolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            memory: DashMap::new(),
            recent: Mutex::new(RecentState::default()),
            policy,
            clock,
        }
    }

    pub fn policy(&self) -> ExpiryPolicy {
        self.policy
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Fresh analysis for `url`, if any. Misses are not errors.
    #[instrument(skip_all, fields(url = %url))]
    pub async fn get(&self, url: &str) -> Option<AnalysisResult> {
        let key = cache_key(url);
        let now = self.clock.now();

        // clone out so the shard lock is released before any removal
        let cached = self.memory.get(&key).map(|entry| entry.value().clone());
        if let Some(entry) = cached {
            if self.policy.is_fresh(entry.fetched_at, now) {
                debug!(tier = "memory", "cache hit");
                return Some(entry.result);
            }
            debug!(tier = "memory", "evicting expired entry");
            // a concurrent put may have replaced the entry since the clone
            self.memory
                .remove_if(&key, |_, e| !self.policy.is_fresh(e.fetched_at, now));
        }

        match self.load_persisted(&key).await {
            Ok(Some(entry)) if self.policy.is_fresh(entry.fetched_at, now) => {
                debug!(tier = "persistent", "cache hit");
                let result = entry.result.clone();
                self.memory.insert(key, entry);
                Some(result)
            }
            Ok(Some(_)) => {
                debug!(tier = "persistent", "evicting expired entry");
                self.discard(&key).await;
                None
            }
            Ok(None) => {
                debug!("cache miss");
                None
            }
            Err(e @ StorageError::Malformed { .. }) => {
                warn!(error = %e, "dropping malformed cache entry");
                self.discard(&key).await;
                None
            }
            Err(e) => {
                warn!(error = %e, "persistent tier unavailable, serving transient tier only");
                None
            }
        }
    }

    /// Stores `result` as the current analysis for `url`.
    #[instrument(skip_all, fields(url = %url))]
    pub async fn put(&self, url: &str, result: AnalysisResult) -> PutOutcome {
        let key = cache_key(url);
        let entry = CacheEntry {
            key: key.clone(),
            url: url.to_string(),
            fetched_at: self.clock.now(),
            result,
        };
        let summary = RecentAnalysis::summarize(&entry.result, entry.fetched_at);

        self.memory.insert(key.clone(), entry.clone());

        let mut failures = Vec::new();

        if let Err(e) = self.persist(&key, &entry).await {
            warn!(error = %e, "failed to persist analysis");
            failures.push(format!("entry: {e}"));
        }

        if let Err(e) = self.push_recent(summary).await {
            warn!(error = %e, "failed to persist recent analyses");
            failures.push(format!("recent list: {e}"));
        }

        if failures.is_empty() {
            PutOutcome::Written
        } else {
            PutOutcome::WrittenDegraded(failures.join("; "))
        }
    }

    /// Most recent first, at most [`MAX_RECENT`] entries.
    ///
    /// While the stored list cannot be read only the analyses recorded by
    /// this instance are returned.
    pub async fn get_recent_analyses(&self) -> Vec<RecentAnalysis> {
        let mut state = self.recent.lock().await;
        match self.load_recent(&mut state).await {
            Ok(()) => state.loaded.clone().unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "could not load recent analyses");
                state.pending.clone()
            }
        }
    }

    /// Drops expired entries from both tiers. Malformed persisted entries
    /// are dropped too.
    #[instrument(skip(self))]
    pub async fn cleanup_expired(&self) -> CleanupReport {
        let now = self.clock.now();
        let mut report = CleanupReport::default();

        self.memory.retain(|_, entry| {
            let keep = !self.policy.is_sweepable(entry.fetched_at, now);
            if !keep {
                report.memory_removed += 1;
            }
            keep
        });

        let keys = match self.store.list_keys(CACHE_PREFIX).await {
            Ok(keys) => keys,
            Err(e) => {
                warn!(error = %e, "could not list persisted analyses, skipping sweep");
                return report;
            }
        };

        for key in keys {
            let sweep = match self.load_persisted(&key).await {
                Ok(Some(entry)) => self.policy.is_sweepable(entry.fetched_at, now),
                Ok(None) => false,
                Err(StorageError::Malformed { .. }) => true,
                Err(e) => {
                    warn!(key = %key, error = %e, "could not read persisted analysis");
                    continue;
                }
            };

            if !sweep {
                continue;
            }

            match self.store.remove_item(&key).await {
                Ok(()) => {
                    debug!(url = url_from_key(&key).as_deref().unwrap_or(&key), "swept");
                    report.persistent_removed += 1;
                }
                Err(e) => warn!(key = %key, error = %e, "could not remove persisted analysis"),
            }
        }

        if report.total() > 0 {
            info!(
                memory_removed = report.memory_removed,
                persistent_removed = report.persistent_removed,
                "removed expired analyses"
            );
        } else {
            debug!("nothing to clean up");
        }

        report
    }

    async fn load_persisted(&self, key: &str) -> Result<Option<CacheEntry>, StorageError> {
        let Some(value) = self.store.get_item(key).await? else {
            return Ok(None);
        };

        serde_json::from_value(value)
            .map(Some)
            .map_err(|e| StorageError::Malformed {
                key: key.to_string(),
                reason: e.to_string(),
            })
    }

    async fn persist(&self, key: &str, entry: &CacheEntry) -> Result<(), StorageError> {
        let value = serde_json::to_value(entry).map_err(|e| StorageError::Malformed {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        self.store.set_item(key, value).await
    }

    async fn discard(&self, key: &str) {
        if let Err(e) = self.store.remove_item(key).await {
            warn!(key = %key, error = %e, "could not remove persisted analysis");
        }
    }

    async fn push_recent(&self, summary: RecentAnalysis) -> Result<(), StorageError> {
        let mut state = self.recent.lock().await;
        if let Err(e) = self.load_recent(&mut state).await {
            // never overwrite a stored list that could not be read
            state.pending.insert(0, summary);
            state.pending.truncate(MAX_RECENT);
            return Err(e);
        }

        let list = state.loaded.get_or_insert_with(Vec::new);
        list.insert(0, summary);
        list.truncate(MAX_RECENT);

        let value = serde_json::to_value(&*list).map_err(|e| StorageError::Malformed {
            key: RECENT_KEY.to_string(),
            reason: e.to_string(),
        })?;
        // held across the write so concurrent puts persist in order
        self.store.set_item(RECENT_KEY, value).await
    }

    /// Reads the stored list once, merging in anything recorded while it
    /// was unreachable. A failed read leaves the state unloaded.
    async fn load_recent(&self, state: &mut RecentState) -> Result<(), StorageError> {
        if state.loaded.is_some() {
            return Ok(());
        }

        let mut stored = self.read_recent().await?;
        let mut list = std::mem::take(&mut state.pending);
        list.append(&mut stored);
        list.truncate(MAX_RECENT);
        state.loaded = Some(list);
        Ok(())
    }

    async fn read_recent(&self) -> Result<Vec<RecentAnalysis>, StorageError> {
        let Some(value) = self.store.get_item(RECENT_KEY).await? else {
            return Ok(Vec::new());
        };

        match serde_json::from_value::<Vec<RecentAnalysis>>(value) {
            Ok(mut list) => {
                list.truncate(MAX_RECENT);
                Ok(list)
            }
            Err(e) => {
                warn!(error = %e, "ignoring malformed recent analyses list");
                Ok(Vec::new())
            }
        }
    }
}
