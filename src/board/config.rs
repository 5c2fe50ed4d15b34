//! Board service configuration.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What happens when a second update targets a task whose first update has
/// not settled yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcurrentUpdatePolicy {
    /// Wait for the in-flight update, then apply against its confirmed result.
    #[default]
    Queue,
    /// Fail fast with a busy error.
    RejectStale,
}

/// Bounded exponential backoff for idempotent reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts, the first one included. Zero behaves like one.
    pub max_attempts: u32,
    /// Delay before the first retry, in milliseconds.
    pub initial_backoff_ms: u64,
    /// Upper bound on any single delay, in milliseconds.
    pub max_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 100,
            max_backoff_ms: 2_000,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff_ms: 0,
            max_backoff_ms: 0,
        }
    }

    /// Returns the delay before retry number `retry` (1-based).
    #[must_use]
    pub fn backoff_for(&self, retry: u32) -> Duration {
        let factor = 2_u64.saturating_pow(retry.saturating_sub(1));
        let millis = self
            .initial_backoff_ms
            .saturating_mul(factor)
            .min(self.max_backoff_ms);
        Duration::from_millis(millis)
    }
}

/// Configuration for [`BoardService`](crate::board::services::BoardService).
///
/// # Examples
///
/// ```
/// use commit_coach::board::config::{BoardConfig, ConcurrentUpdatePolicy};
///
/// let config = BoardConfig::from_json(r#"{ "update_policy": "reject_stale" }"#)
///     .expect("valid configuration");
/// assert_eq!(config.update_policy, ConcurrentUpdatePolicy::RejectStale);
/// assert_eq!(config.due_soon_window_hours, 24);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Maximum title length in characters.
    pub max_title_length: usize,
    /// Hours ahead of now that count as "due soon".
    pub due_soon_window_hours: u32,
    /// Apply moves and edits locally before the gateway confirms them.
    pub optimistic_updates: bool,
    /// Handling of overlapping updates to one task.
    pub update_policy: ConcurrentUpdatePolicy,
    /// Retry policy for task listing.
    pub list_retry: RetryPolicy,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            max_title_length: 200,
            due_soon_window_hours: 24,
            optimistic_updates: true,
            update_policy: ConcurrentUpdatePolicy::Queue,
            list_retry: RetryPolicy::default(),
        }
    }
}

impl BoardConfig {
    /// Creates a configuration that rejects overlapping updates and caps
    /// titles at 80 characters.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            max_title_length: 80,
            update_policy: ConcurrentUpdatePolicy::RejectStale,
            ..Self::default()
        }
    }

    /// Creates a configuration that only reflects gateway-confirmed state.
    #[must_use]
    pub fn pessimistic() -> Self {
        Self {
            optimistic_updates: false,
            ..Self::default()
        }
    }

    /// Parses a JSON document. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns the parser error for malformed JSON or mistyped fields.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Returns the due-soon window.
    #[must_use]
    pub fn due_soon_window(&self) -> TimeDelta {
        TimeDelta::hours(i64::from(self.due_soon_window_hours))
    }
}
