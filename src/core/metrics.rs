//! Logger metrics for observability
//!
//! Counters for delivered, filtered and failed messages, plus queue
//! statistics for queued appenders.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logger observability
///
/// # Example
///
/// ```
/// use severity_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_delivered();
/// metrics.record_filtered();
///
/// assert_eq!(metrics.delivered(), 1);
/// assert_eq!(metrics.filtered(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Messages that passed the mask and were accepted by at least one appender
    delivered: AtomicU64,

    /// Messages rejected by the level mask
    filtered: AtomicU64,

    /// Individual appender calls that returned an error or panicked
    appender_failures: AtomicU64,

    /// Messages a queue dropped on overflow
    queue_dropped: AtomicU64,

    /// Number of times a queue was found full
    queue_full_events: AtomicU64,

    /// Number of times a sender blocked waiting for queue space
    block_events: AtomicU64,

    /// Critical messages that waited for space instead of being dropped
    critical_preserved: AtomicU64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            delivered: AtomicU64::new(0),
            filtered: AtomicU64::new(0),
            appender_failures: AtomicU64::new(0),
            queue_dropped: AtomicU64::new(0),
            queue_full_events: AtomicU64::new(0),
            block_events: AtomicU64::new(0),
            critical_preserved: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn filtered(&self) -> u64 {
        self.filtered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn appender_failures(&self) -> u64 {
        self.appender_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn queue_dropped(&self) -> u64 {
        self.queue_dropped.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn queue_full_events(&self) -> u64 {
        self.queue_full_events.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn block_events(&self) -> u64 {
        self.block_events.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn critical_preserved(&self) -> u64 {
        self.critical_preserved.load(Ordering::Relaxed)
    }

    /// Each `record_*` returns the previous value
    #[inline]
    pub fn record_delivered(&self) -> u64 {
        self.delivered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.filtered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_appender_failure(&self) -> u64 {
        self.appender_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_queue_dropped(&self) -> u64 {
        self.queue_dropped.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_queue_full(&self) -> u64 {
        self.queue_full_events.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_block(&self) -> u64 {
        self.block_events.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_critical_preserved(&self) -> u64 {
        self.critical_preserved.fetch_add(1, Ordering::Relaxed)
    }

    /// Queue drop rate as a percentage (0.0 - 100.0) of everything offered
    ///
    /// Returns 0.0 if nothing has been delivered or dropped.
    pub fn drop_rate(&self) -> f64 {
        let dropped = self.queue_dropped() as f64;
        let total = self.delivered() as f64 + dropped;
        if total == 0.0 {
            0.0
        } else {
            (dropped / total) * 100.0
        }
    }

    pub fn reset(&self) {
        self.delivered.store(0, Ordering::Relaxed);
        self.filtered.store(0, Ordering::Relaxed);
        self.appender_failures.store(0, Ordering::Relaxed);
        self.queue_dropped.store(0, Ordering::Relaxed);
        self.queue_full_events.store(0, Ordering::Relaxed);
        self.block_events.store(0, Ordering::Relaxed);
        self.critical_preserved.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            delivered: AtomicU64::new(self.delivered()),
            filtered: AtomicU64::new(self.filtered()),
            appender_failures: AtomicU64::new(self.appender_failures()),
            queue_dropped: AtomicU64::new(self.queue_dropped()),
            queue_full_events: AtomicU64::new(self.queue_full_events()),
            block_events: AtomicU64::new(self.block_events()),
            critical_preserved: AtomicU64::new(self.critical_preserved()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.delivered(), 0);
        assert_eq!(metrics.filtered(), 0);
        assert_eq!(metrics.appender_failures(), 0);
        assert_eq!(metrics.queue_dropped(), 0);
        assert_eq!(metrics.critical_preserved(), 0);
    }

    #[test]
    fn test_record_returns_previous_value() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.record_filtered(), 0);
        assert_eq!(metrics.record_filtered(), 1);
        assert_eq!(metrics.filtered(), 2);
    }

    #[test]
    fn test_metrics_drop_rate() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.drop_rate(), 0.0);

        for _ in 0..90 {
            metrics.record_delivered();
        }
        for _ in 0..10 {
            metrics.record_queue_dropped();
        }

        let rate = metrics.drop_rate();
        assert!((9.9..=10.1).contains(&rate), "Drop rate was {}", rate);
    }

    #[test]
    fn test_metrics_reset() {
        let metrics = LoggerMetrics::new();
        metrics.record_delivered();
        metrics.record_appender_failure();
        metrics.record_queue_full();

        metrics.reset();

        assert_eq!(metrics.delivered(), 0);
        assert_eq!(metrics.appender_failures(), 0);
        assert_eq!(metrics.queue_full_events(), 0);
    }

    #[test]
    fn test_metrics_clone_is_snapshot() {
        let metrics = LoggerMetrics::new();
        metrics.record_delivered();
        metrics.record_delivered();

        let snapshot = metrics.clone();
        metrics.record_delivered();

        assert_eq!(snapshot.delivered(), 2);
        assert_eq!(metrics.delivered(), 3);
    }
}
