use chrono::Duration;

/// Thresholds for the failed-login lockout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutPolicy {
    /// Failures at which an identity becomes locked.
    pub max_failed_attempts: u32,

    /// Quiet period after the last failure that lifts the lock. `None` keeps
    /// an identity locked until an operator resets it.
    pub unlock_after: Option<Duration>,
}

impl LockoutPolicy {
    pub const DEFAULT_MAX_FAILED_ATTEMPTS: u32 = 5;

    pub fn new(max_failed_attempts: u32) -> Self {
        Self {
            max_failed_attempts,
            unlock_after: None,
        }
    }

    pub fn with_unlock_after(mut self, unlock_after: Duration) -> Self {
        self.unlock_after = Some(unlock_after);
        self
    }
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_FAILED_ATTEMPTS)
    }
}
