//! # Engine Configuration
//!
//! Tunables of the sale engine. The API binary fills these from the
//! environment; tests use the defaults or shrink the retry budget.

use std::time::Duration;

/// Sale engine configuration.
///
/// ## Example
/// ```rust
/// use kora_sales::EngineConfig;
/// use std::time::Duration;
///
/// let config = EngineConfig::default().commit_max_retry(Duration::from_millis(500));
/// assert_eq!(config.commit_max_retry, Duration::from_millis(500));
/// ```
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Total time spent retrying a unit of work that hit lock contention.
    /// Default: 2 seconds
    pub commit_max_retry: Duration,

    /// First back-off interval between retries.
    /// Default: 20 milliseconds
    pub initial_backoff: Duration,

    /// Capacity of the outbound notification queue.
    /// Default: 256
    pub notify_queue_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            commit_max_retry: Duration::from_secs(2),
            initial_backoff: Duration::from_millis(20),
            notify_queue_capacity: 256,
        }
    }
}

impl EngineConfig {
    /// Sets the retry budget for conflicting commits.
    pub fn commit_max_retry(mut self, budget: Duration) -> Self {
        self.commit_max_retry = budget;
        self
    }

    /// Sets the first back-off interval.
    pub fn initial_backoff(mut self, interval: Duration) -> Self {
        self.initial_backoff = interval;
        self
    }

    /// Sets the notification queue capacity.
    pub fn notify_queue_capacity(mut self, capacity: usize) -> Self {
        self.notify_queue_capacity = capacity;
        self
    }
}
