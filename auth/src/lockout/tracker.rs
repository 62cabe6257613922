use std::collections::HashMap;

use chrono::DateTime;
use chrono::Utc;
use parking_lot::Mutex;
use thiserror::Error;

use super::policy::LockoutPolicy;

/// Lower-case an identity so every lockout lookup is case-insensitive.
pub fn normalize_identity(identity: &str) -> String {
    identity.to_lowercase()
}

/// Failed-attempt bookkeeping for one identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutEntry {
    pub failed_attempts: u32,
    /// Attempts admitted by [`LockoutTracker::begin_attempt`] and not yet settled.
    pub in_flight: u32,
    pub last_attempt: DateTime<Utc>,
}

impl LockoutEntry {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            failed_attempts: 0,
            in_flight: 0,
            last_attempt: now,
        }
    }

    fn is_stale(&self, policy: &LockoutPolicy, now: DateTime<Utc>) -> bool {
        policy
            .unlock_after
            .map_or(false, |window| now - self.last_attempt >= window)
    }

    fn effective_attempts(&self, policy: &LockoutPolicy, now: DateTime<Utc>) -> u32 {
        if self.is_stale(policy, now) {
            0
        } else {
            self.failed_attempts
        }
    }

    fn release(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }
}

/// Attempt refused because the identity is locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Identity is locked")]
pub struct IdentityLocked;

/// Admission for one authentication attempt.
///
/// Counts toward the threshold from the moment it is granted, so concurrent
/// attempts cannot all slip past the gate. Settle it with
/// [`AttemptGuard::fail`] or [`AttemptGuard::succeed`]; dropping it unsettled
/// gives the reservation back without counting a failure.
#[must_use]
pub struct AttemptGuard<'a> {
    tracker: &'a LockoutTracker,
    identity: String,
    settled: bool,
}

impl AttemptGuard<'_> {
    /// Normalized identity this attempt was admitted for.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Count the attempt as failed and return the new total.
    pub fn fail(mut self) -> u32 {
        self.settled = true;
        self.tracker.apply_failure(&self.identity, true)
    }

    /// Reset the identity's counter.
    pub fn succeed(mut self) {
        self.settled = true;
        self.tracker.apply_success(&self.identity, true);
    }
}

impl Drop for AttemptGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            if let Some(entry) = self.tracker.entries.lock().get_mut(&self.identity) {
                entry.release();
            }
        }
    }
}

/// Per-identity failed-login counter with a lock threshold.
///
/// An identity is OPEN while its count is below
/// [`LockoutPolicy::max_failed_attempts`] and LOCKED once it reaches it.
/// A single mutex guards the whole table so each read-modify-write is
/// atomic; concurrent failures for one identity are never lost.
#[derive(Debug, Default)]
pub struct LockoutTracker {
    policy: LockoutPolicy,
    entries: Mutex<HashMap<String, LockoutEntry>>,
}

impl LockoutTracker {
    pub fn new(policy: LockoutPolicy) -> Self {
        Self {
            policy,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn policy(&self) -> &LockoutPolicy {
        &self.policy
    }

    /// Whether the identity has reached the failure threshold.
    pub fn is_locked(&self, identity: &str) -> bool {
        self.failed_attempts(identity) >= self.policy.max_failed_attempts
    }

    /// Current failure count, 0 for identities never seen.
    pub fn failed_attempts(&self, identity: &str) -> u32 {
        let now = Utc::now();
        self.entries
            .lock()
            .get(&normalize_identity(identity))
            .map_or(0, |entry| entry.effective_attempts(&self.policy, now))
    }

    /// Admit an authentication attempt, or refuse it if the identity is locked.
    ///
    /// Checks the threshold and reserves the attempt under one lock. Failures
    /// plus unsettled attempts never exceed the threshold. Every call, refused
    /// or not, moves `last_attempt`, so the unlock window runs from the most
    /// recent attempt.
    ///
    /// # Errors
    /// * `IdentityLocked` - Recorded and pending attempts already reach the threshold
    pub fn begin_attempt(&self, identity: &str) -> Result<AttemptGuard<'_>, IdentityLocked> {
        let identity = normalize_identity(identity);
        let now = Utc::now();

        {
            let mut entries = self.entries.lock();
            let entry = entries
                .entry(identity.clone())
                .or_insert_with(|| LockoutEntry::new(now));

            entry.failed_attempts = entry.effective_attempts(&self.policy, now);
            entry.last_attempt = now;

            if entry.failed_attempts.saturating_add(entry.in_flight)
                >= self.policy.max_failed_attempts
            {
                return Err(IdentityLocked);
            }

            entry.in_flight += 1;
        }

        Ok(AttemptGuard {
            tracker: self,
            identity,
            settled: false,
        })
    }

    /// Count a failed attempt and return the new total.
    pub fn record_failure(&self, identity: &str) -> u32 {
        self.apply_failure(&normalize_identity(identity), false)
    }

    /// Reset the counter after a successful authentication.
    pub fn record_success(&self, identity: &str) {
        self.apply_success(&normalize_identity(identity), false);
    }

    /// Operator reset for a single identity.
    ///
    /// # Returns
    /// True if the identity had any recorded attempts
    pub fn unlock(&self, identity: &str) -> bool {
        let identity = normalize_identity(identity);
        let removed = self.entries.lock().remove(&identity).is_some();

        if removed {
            tracing::info!(identity = %identity, "Lockout entry cleared");
        }

        removed
    }

    /// Forget every recorded attempt.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn entry(&self, identity: &str) -> Option<LockoutEntry> {
        self.entries.lock().get(&normalize_identity(identity)).copied()
    }

    fn apply_failure(&self, identity: &str, reserved: bool) -> u32 {
        let now = Utc::now();

        let attempts = {
            let mut entries = self.entries.lock();
            let entry = entries
                .entry(identity.to_string())
                .or_insert_with(|| LockoutEntry::new(now));

            if reserved {
                entry.release();
            }
            entry.failed_attempts = entry.effective_attempts(&self.policy, now).saturating_add(1);
            entry.last_attempt = now;
            entry.failed_attempts
        };

        if attempts == self.policy.max_failed_attempts {
            tracing::warn!(
                identity = %identity,
                failed_attempts = attempts,
                "Identity locked after repeated failed logins"
            );
        }

        attempts
    }

    fn apply_success(&self, identity: &str, reserved: bool) {
        let now = Utc::now();

        let mut entries = self.entries.lock();
        if let Some(entry) = entries.get_mut(identity) {
            if reserved {
                entry.release();
            }
            entry.failed_attempts = 0;
            entry.last_attempt = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use chrono::Duration;

    use super::*;

    #[test]
    fn test_unseen_identity_is_open() {
        let tracker = LockoutTracker::default();

        assert_eq!(tracker.failed_attempts("nobody@example.com"), 0);
        assert!(!tracker.is_locked("nobody@example.com"));
        assert!(tracker.entry("nobody@example.com").is_none());
    }

    #[test]
    fn test_locks_at_threshold() {
        let tracker = LockoutTracker::default();

        for expected in 1..5 {
            assert_eq!(tracker.record_failure("a@x.com"), expected);
            assert!(!tracker.is_locked("a@x.com"));
        }

        assert_eq!(tracker.record_failure("a@x.com"), 5);
        assert!(tracker.is_locked("a@x.com"));
    }

    #[test]
    fn test_success_resets_counter() {
        let tracker = LockoutTracker::default();

        tracker.record_failure("a@x.com");
        tracker.record_failure("a@x.com");
        assert_eq!(tracker.failed_attempts("a@x.com"), 2);

        tracker.record_success("a@x.com");

        assert_eq!(tracker.failed_attempts("a@x.com"), 0);
        assert!(tracker.entry("a@x.com").is_some());
    }

    #[test]
    fn test_success_unlocks_locked_identity() {
        let tracker = LockoutTracker::new(LockoutPolicy::new(2));

        tracker.record_failure("a@x.com");
        tracker.record_failure("a@x.com");
        assert!(tracker.is_locked("a@x.com"));

        tracker.record_success("a@x.com");
        assert!(!tracker.is_locked("a@x.com"));
    }

    #[test]
    fn test_identities_are_case_insensitive() {
        let tracker = LockoutTracker::default();

        tracker.record_failure("Alice@Example.com");
        tracker.record_failure("ALICE@EXAMPLE.COM");

        assert_eq!(tracker.failed_attempts("alice@example.com"), 2);
    }

    #[test]
    fn test_identities_are_independent() {
        let tracker = LockoutTracker::new(LockoutPolicy::new(1));

        tracker.record_failure("a@x.com");

        assert!(tracker.is_locked("a@x.com"));
        assert!(!tracker.is_locked("b@x.com"));
    }

    #[test]
    fn test_unlock_and_clear() {
        let tracker = LockoutTracker::new(LockoutPolicy::new(1));

        tracker.record_failure("a@x.com");
        tracker.record_failure("b@x.com");

        assert!(tracker.unlock("A@x.com"));
        assert!(!tracker.unlock("a@x.com"));
        assert!(!tracker.is_locked("a@x.com"));
        assert!(tracker.is_locked("b@x.com"));

        tracker.clear();
        assert!(!tracker.is_locked("b@x.com"));
    }

    #[test]
    fn test_without_unlock_window_lock_persists() {
        let tracker = LockoutTracker::new(LockoutPolicy::new(1));

        tracker.record_failure("a@x.com");

        assert!(tracker.is_locked("a@x.com"));
        assert_eq!(tracker.policy().unlock_after, None);
    }

    #[test]
    fn test_unlock_window_elapsed_reopens() {
        let policy = LockoutPolicy::new(1).with_unlock_after(Duration::zero());
        let tracker = LockoutTracker::new(policy);

        tracker.record_failure("a@x.com");

        assert!(!tracker.is_locked("a@x.com"));
        // Counting restarts instead of continuing from the stale total.
        assert_eq!(tracker.record_failure("a@x.com"), 1);
    }

    #[test]
    fn test_unlock_window_not_elapsed_stays_locked() {
        let policy = LockoutPolicy::new(2).with_unlock_after(Duration::hours(1));
        let tracker = LockoutTracker::new(policy);

        tracker.record_failure("a@x.com");
        tracker.record_failure("a@x.com");

        assert!(tracker.is_locked("a@x.com"));
        assert_eq!(tracker.record_failure("a@x.com"), 3);
    }

    #[test]
    fn test_concurrent_failures_are_all_counted() {
        let tracker = Arc::new(LockoutTracker::new(LockoutPolicy::new(1000)));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let tracker = Arc::clone(&tracker);
                thread::spawn(move || {
                    for _ in 0..50 {
                        tracker.record_failure("a@x.com");
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(tracker.failed_attempts("a@x.com"), 400);
    }

    #[test]
    fn test_begin_attempt_counts_pending_attempts() {
        let tracker = LockoutTracker::new(LockoutPolicy::new(2));

        let first = tracker.begin_attempt("a@x.com").expect("First attempt refused");
        let second = tracker.begin_attempt("A@X.com").expect("Second attempt refused");

        assert_eq!(tracker.begin_attempt("a@x.com").err(), Some(IdentityLocked));
        assert!(!tracker.is_locked("a@x.com"));
        assert_eq!(tracker.entry("a@x.com").unwrap().in_flight, 2);

        assert_eq!(first.fail(), 1);
        assert_eq!(second.fail(), 2);
        assert!(tracker.is_locked("a@x.com"));
        assert_eq!(tracker.entry("a@x.com").unwrap().in_flight, 0);
    }

    #[test]
    fn test_unsettled_attempt_is_released_on_drop() {
        let tracker = LockoutTracker::new(LockoutPolicy::new(1));

        let attempt = tracker.begin_attempt("a@x.com").expect("Attempt refused");
        assert!(tracker.begin_attempt("a@x.com").is_err());
        drop(attempt);

        assert_eq!(tracker.failed_attempts("a@x.com"), 0);
        assert!(tracker.begin_attempt("a@x.com").is_ok());
    }

    #[test]
    fn test_successful_attempt_resets_counter() {
        let tracker = LockoutTracker::default();
        tracker.record_failure("a@x.com");
        tracker.record_failure("a@x.com");

        tracker
            .begin_attempt("a@x.com")
            .expect("Attempt refused")
            .succeed();

        let entry = tracker.entry("a@x.com").unwrap();
        assert_eq!(entry.failed_attempts, 0);
        assert_eq!(entry.in_flight, 0);
    }

    #[test]
    fn test_refused_attempt_restarts_unlock_window() {
        let policy = LockoutPolicy::new(1).with_unlock_after(Duration::hours(1));
        let tracker = LockoutTracker::new(policy);
        tracker.record_failure("a@x.com");

        let earlier = Utc::now() - Duration::minutes(30);
        tracker
            .entries
            .lock()
            .get_mut("a@x.com")
            .unwrap()
            .last_attempt = earlier;

        assert!(tracker.begin_attempt("a@x.com").is_err());

        let entry = tracker.entry("a@x.com").unwrap();
        assert!(entry.last_attempt > earlier);
        assert_eq!(entry.failed_attempts, 1);
    }

    #[test]
    fn test_attempt_after_unlock_window_is_admitted() {
        let policy = LockoutPolicy::new(1).with_unlock_after(Duration::hours(1));
        let tracker = LockoutTracker::new(policy);
        tracker.record_failure("a@x.com");

        tracker
            .entries
            .lock()
            .get_mut("a@x.com")
            .unwrap()
            .last_attempt = Utc::now() - Duration::hours(2);

        let attempt = tracker.begin_attempt("a@x.com").expect("Attempt refused");
        assert_eq!(attempt.fail(), 1);
    }
}
