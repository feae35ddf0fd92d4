//! Debounced autosave
//!
//! The host reports each mutation and polls from its event loop; a save
//! becomes due once no mutation has been reported for the quiet window.
//! A burst of edits therefore produces a single save. The clock is supplied
//! by the caller so the schedule is deterministic under test.

use std::time::{Duration, Instant};

/// Default quiet window before a pending save fires
pub const DEFAULT_QUIET_WINDOW: Duration = Duration::from_millis(400);

/// Debounce state for one saveable resource
#[derive(Debug, Clone)]
pub struct Autosave {
    quiet_window: Duration,
    last_mutation: Option<Instant>,
}

impl Default for Autosave {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_WINDOW)
    }
}

impl Autosave {
    pub fn new(quiet_window: Duration) -> Self {
        Self {
            quiet_window,
            last_mutation: None,
        }
    }

    /// Record a mutation, pushing any pending save back
    pub fn notify_mutation(&mut self, now: Instant) {
        self.last_mutation = Some(now);
    }

    /// Whether a save is waiting to fire
    pub fn is_pending(&self) -> bool {
        self.last_mutation.is_some()
    }

    /// When the pending save will be due, if any
    pub fn due_at(&self) -> Option<Instant> {
        self.last_mutation.map(|at| at + self.quiet_window)
    }

    /// Claim the pending save if its quiet window has elapsed
    ///
    /// Returns `true` at most once per burst; the caller must then issue
    /// the save.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.due_at() {
            Some(due) if now >= due => {
                self.last_mutation = None;
                true
            }
            _ => false,
        }
    }

    /// Claim the pending save regardless of the window (e.g. on exit)
    pub fn take_pending(&mut self) -> bool {
        self.last_mutation.take().is_some()
    }

    pub fn quiet_window(&self) -> Duration {
        self.quiet_window
    }
}
