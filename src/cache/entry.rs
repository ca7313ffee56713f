use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::AnalysisResult;

/// Unit stored in both tiers. Replaced wholesale, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub key: String,
    pub url: String,
    pub fetched_at: DateTime<Utc>,
    pub result: AnalysisResult,
}

/// How long a cached analysis stays usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryPolicy {
    window: Option<Duration>,
    retention: Duration,
}

impl ExpiryPolicy {
    pub const DEFAULT_WINDOW_HOURS: i64 = 24;
    pub const UNBOUNDED_RETENTION_DAYS: i64 = 30;

    pub fn expiring(window: Duration) -> Self {
        Self {
            window: Some(window),
            retention: window,
        }
    }

    /// Entries never expire on read; the sweep still drops anything older
    /// than the retention horizon.
    pub fn unbounded() -> Self {
        Self {
            window: None,
            retention: Duration::days(Self::UNBOUNDED_RETENTION_DAYS),
        }
    }

    /// `None` selects [`ExpiryPolicy::unbounded`].
    pub fn from_window(window: Option<std::time::Duration>) -> Self {
        match window {
            Some(window) => Self::expiring(
                Duration::from_std(window).unwrap_or_else(|_| Duration::days(365 * 100)),
            ),
            None => Self::unbounded(),
        }
    }

    pub fn window(&self) -> Option<Duration> {
        self.window
    }

    pub fn is_fresh(&self, fetched_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self.window {
            Some(window) => now.signed_duration_since(fetched_at) < window,
            None => true,
        }
    }

    pub fn is_sweepable(&self, fetched_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let age = now.signed_duration_since(fetched_at);
        match self.window {
            Some(window) => age >= window,
            None => age > self.retention,
        }
    }
}

impl Default for ExpiryPolicy {
    fn default() -> Self {
        Self::expiring(Duration::hours(Self::DEFAULT_WINDOW_HOURS))
    }
}
