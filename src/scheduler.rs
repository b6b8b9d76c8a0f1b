//! Debounce scheduler for outbound mediation requests.
//!
//! Keystrokes arrive far faster than the remote service can answer, so a
//! change only becomes a request once typing has settled for the debounce
//! window. A trigger point (space/enter) bypasses the window entirely.
//!
//! The scheduler holds at most one armed deadline. Arming replaces any
//! previous deadline, so earlier timers can never fire alongside a newer one;
//! the owning loop drives expiry by calling [`MediationScheduler::poll`].

use std::time::{Duration, Instant};

/// Quiet period after the last change before a request is issued.
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(800);

#[derive(Debug)]
pub struct MediationScheduler {
    deadline: Option<Instant>,
    delay: Duration,
}

impl Default for MediationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl MediationScheduler {
    pub fn new() -> Self {
        Self::with_delay(DEBOUNCE_DELAY)
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            deadline: None,
            delay,
        }
    }

    /// The buffer changed: restart the quiet-period countdown.
    pub fn notify_changed(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// A likely natural pause (space/enter). Disarms the countdown; the
    /// caller issues the request immediately.
    pub fn notify_trigger_point(&mut self) {
        self.deadline = None;
    }

    /// Drop any pending countdown without issuing anything.
    pub fn cancel_all(&mut self) {
        self.deadline = None;
    }

    /// True exactly once per armed deadline, when it has elapsed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }
}
