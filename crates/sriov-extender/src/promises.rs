use chrono::{DateTime, Utc};
use sriov_core::SlotCount;
use tracing::debug;

/// Cluster-wide log of in-flight reservations.
///
/// A promise is one slot offered to some pod on some node, not yet confirmed
/// bound by the scheduler. Promises are global, not per node: each one is
/// charged against every node's free capacity.
///
/// Invariant: `promised == promises.len()` after every operation.
#[derive(Debug, Default)]
pub struct PromiseTracker {
    promises: Vec<DateTime<Utc>>,
    promised: SlotCount,
}

impl PromiseTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregate number of outstanding promises
    pub fn global_promised_count(&self) -> SlotCount {
        self.promised
    }

    /// Record a promise made now
    pub fn record_promise(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        self.record_promise_at(now);
        now
    }

    /// Record a promise made at the given time
    pub fn record_promise_at(&mut self, created_at: DateTime<Utc>) {
        self.promises.push(created_at);
        self.promised += 1;
        self.check_invariant();
    }

    /// Drop every promise created strictly before `older_than`.
    ///
    /// Returns how many were removed; the aggregate count drops by the same amount.
    pub fn purge_expired(&mut self, older_than: DateTime<Utc>) -> usize {
        let before = self.promises.len();
        self.promises.retain(|created_at| *created_at >= older_than);
        let removed = before - self.promises.len();

        self.promised -= removed as SlotCount;
        self.check_invariant();

        if removed > 0 {
            debug!(
                "Purged {} promises older than {}, {} outstanding",
                removed, older_than, self.promised
            );
        }
        removed
    }

    /// Number of recorded promises
    pub fn len(&self) -> usize {
        self.promises.len()
    }

    /// Whether no promise is outstanding
    pub fn is_empty(&self) -> bool {
        self.promises.is_empty()
    }

    /// Creation time of the oldest outstanding promise
    pub fn oldest(&self) -> Option<DateTime<Utc>> {
        self.promises.iter().min().copied()
    }

    fn check_invariant(&self) {
        debug_assert_eq!(
            self.promised,
            self.promises.len() as SlotCount,
            "promised count diverged from promise log"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_record_promise() {
        let mut tracker = PromiseTracker::new();
        assert!(tracker.is_empty());
        assert_eq!(tracker.global_promised_count(), 0);

        let first = tracker.record_promise();
        tracker.record_promise();

        assert_eq!(tracker.global_promised_count(), 2);
        assert_eq!(tracker.len(), 2);
        assert_eq!(tracker.oldest(), Some(first));
    }

    #[test]
    fn test_purge_expired_removes_only_older() {
        let mut tracker = PromiseTracker::new();
        let now = Utc::now();
        tracker.record_promise_at(now - Duration::seconds(120));
        tracker.record_promise_at(now - Duration::seconds(60));
        tracker.record_promise_at(now);

        let removed = tracker.purge_expired(now - Duration::seconds(60));

        // The promise exactly at the cutoff is kept
        assert_eq!(removed, 1);
        assert_eq!(tracker.global_promised_count(), 2);
        assert_eq!(tracker.len(), 2);
        assert_eq!(tracker.oldest(), Some(now - Duration::seconds(60)));
    }

    #[test]
    fn test_purge_out_of_order_timestamps() {
        let mut tracker = PromiseTracker::new();
        let now = Utc::now();
        tracker.record_promise_at(now);
        tracker.record_promise_at(now - Duration::seconds(300));
        tracker.record_promise_at(now - Duration::seconds(1));

        assert_eq!(tracker.oldest(), Some(now - Duration::seconds(300)));
        assert_eq!(tracker.purge_expired(now - Duration::seconds(10)), 1);
        assert_eq!(tracker.global_promised_count(), 2);
        assert_eq!(tracker.len(), 2);
        assert_eq!(tracker.oldest(), Some(now - Duration::seconds(1)));
    }

    #[test]
    fn test_purge_everything_and_nothing() {
        let mut tracker = PromiseTracker::new();
        assert_eq!(tracker.purge_expired(Utc::now()), 0);

        let now = Utc::now();
        for i in 0..5 {
            tracker.record_promise_at(now - Duration::seconds(i));
        }
        assert_eq!(tracker.purge_expired(now - Duration::seconds(3600)), 0);
        assert_eq!(tracker.purge_expired(now + Duration::seconds(1)), 5);
        assert!(tracker.is_empty());
        assert_eq!(tracker.global_promised_count(), 0);
        assert_eq!(tracker.oldest(), None);
    }
}
