//! Single pending save task with a quiesce delay.
//!
//! # Invariants
//! - At most one write is pending at any time.
//! - Rescheduling replaces the pending deadline; it never adds a second one.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct SaveDebouncer {
    delay: Duration,
    pending: Option<Instant>,
}

impl SaveDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arms the save task `delay` from now, replacing any earlier deadline.
    pub fn schedule(&mut self) {
        self.schedule_at(Instant::now());
    }

    pub fn schedule_at(&mut self, now: Instant) {
        self.pending = Some(now + self.delay);
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Returns `true` once when the deadline has passed, disarming the task.
    pub fn take_due_at(&mut self, now: Instant) -> bool {
        match self.pending {
            Some(deadline) if deadline <= now => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SaveDebouncer;
    use std::time::{Duration, Instant};

    #[test]
    fn rescheduling_pushes_deadline_back() {
        let start = Instant::now();
        let mut debouncer = SaveDebouncer::new(Duration::from_millis(100));
        debouncer.schedule_at(start);
        debouncer.schedule_at(start + Duration::from_millis(80));

        assert!(!debouncer.take_due_at(start + Duration::from_millis(120)));
        assert!(debouncer.take_due_at(start + Duration::from_millis(180)));
        assert!(!debouncer.take_due_at(start + Duration::from_millis(500)));
    }

    #[test]
    fn cancel_disarms_pending_task() {
        let start = Instant::now();
        let mut debouncer = SaveDebouncer::new(Duration::from_millis(10));
        debouncer.schedule_at(start);
        assert!(debouncer.is_pending());
        debouncer.cancel();
        assert!(!debouncer.take_due_at(start + Duration::from_secs(1)));
    }
}
