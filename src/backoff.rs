//! Upstream backoff tracker keyed by request fingerprint.
//!
//! When a provider reports a rate limit or overload, the
//! [`Orchestrator`](crate::orchestrator::Orchestrator) records a deadline
//! here; until it passes, requests for the same fingerprint are answered
//! locally instead of hitting the provider again. Entries are never
//! swept — an expired deadline is simply inert, and the next throttle
//! overwrites it.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Fallback window when `now + seconds` is not representable as an
/// [`Instant`]. One year outlives any real throttle.
const SATURATED_WINDOW: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Fingerprint → "do not call upstream before" deadlines.
///
/// Thread-safe; reads degrade to "not blocked" if the lock is poisoned,
/// since a missing backoff hint only costs one extra upstream call.
#[derive(Debug, Default)]
pub struct BackoffTracker {
    deadlines: RwLock<HashMap<String, Instant>>,
}

impl BackoffTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a deadline for this fingerprint lies in the future.
    pub fn is_blocked(&self, fingerprint: &str) -> bool {
        self.deadline(fingerprint)
            .is_some_and(|until| Instant::now() < until)
    }

    /// Whole seconds until the deadline passes, rounded up and never
    /// less than 1. `None` once the fingerprint is no longer blocked.
    pub fn seconds_remaining(&self, fingerprint: &str) -> Option<u64> {
        let until = self.deadline(fingerprint)?;
        let now = Instant::now();
        if now >= until {
            return None;
        }
        let remaining_ms = until.duration_since(now).as_millis();
        Some(remaining_ms.div_ceil(1000).max(1) as u64)
    }

    /// Set or overwrite the deadline to `now + seconds`, saturating to
    /// [`SATURATED_WINDOW`] when the sum is not representable.
    pub fn block(&self, fingerprint: impl Into<String>, seconds: u64) {
        let now = Instant::now();
        let until = now
            .checked_add(Duration::from_secs(seconds))
            .unwrap_or_else(|| now + SATURATED_WINDOW);
        if let Ok(mut deadlines) = self.deadlines.write() {
            deadlines.insert(fingerprint.into(), until);
        }
    }

    fn deadline(&self, fingerprint: &str) -> Option<Instant> {
        self.deadlines.read().ok()?.get(fingerprint).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_fingerprint_is_not_blocked() {
        let tracker = BackoffTracker::new();
        assert!(!tracker.is_blocked("math-fractions"));
        assert_eq!(tracker.seconds_remaining("math-fractions"), None);
    }

    #[test]
    fn block_takes_effect_immediately() {
        let tracker = BackoffTracker::new();
        tracker.block("math-fractions", 60);

        assert!(tracker.is_blocked("math-fractions"));
        let remaining = tracker.seconds_remaining("math-fractions").unwrap();
        assert!((59..=60).contains(&remaining), "remaining = {remaining}");
    }

    #[test]
    fn block_overwrites_existing_deadline() {
        let tracker = BackoffTracker::new();
        tracker.block("math-fractions", 600);
        tracker.block("math-fractions", 5);

        let remaining = tracker.seconds_remaining("math-fractions").unwrap();
        assert!(remaining <= 5, "remaining = {remaining}");
    }

    #[test]
    fn remaining_is_rounded_up_to_at_least_one() {
        let tracker = BackoffTracker::new();
        tracker.block("math-fractions", 1);

        // Partway through the window the remainder is sub-second, but the
        // caller-facing value must still be a whole positive second.
        std::thread::sleep(Duration::from_millis(400));
        assert_eq!(tracker.seconds_remaining("math-fractions"), Some(1));
    }

    #[test]
    fn deadline_expires_with_wall_clock() {
        let tracker = BackoffTracker::new();
        tracker.block("math-fractions", 0);

        assert!(!tracker.is_blocked("math-fractions"));
        assert_eq!(tracker.seconds_remaining("math-fractions"), None);
    }

    #[test]
    fn fingerprints_are_independent() {
        let tracker = BackoffTracker::new();
        tracker.block("math-fractions", 60);

        assert!(tracker.is_blocked("math-fractions"));
        assert!(!tracker.is_blocked("science-light"));
    }

    #[test]
    fn block_saturates_on_oversized_seconds() {
        let tracker = BackoffTracker::new();
        tracker.block("math-fractions", u64::MAX);

        assert!(tracker.is_blocked("math-fractions"));
        assert!(tracker.seconds_remaining("math-fractions").is_some());
    }
}
