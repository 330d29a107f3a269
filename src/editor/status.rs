use std::{
    cell::Cell,
    rc::Rc,
    time::{Duration, Instant},
};

/// Source of the current time for the status auto-clear.
pub trait Clock {
    /// The current instant.
    fn now(&self) -> Instant;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same time, so a test can keep one handle and give the
/// other to an [`Editor`](crate::Editor).
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl ManualClock {
    /// Creates a clock frozen at the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::now())),
        }
    }

    /// Moves the clock forward.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// One-shot deadline for clearing the status banner.
///
/// Scheduling replaces any pending deadline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct StatusTimer {
    deadline: Option<Instant>,
}

impl StatusTimer {
    pub(crate) fn schedule(&mut self, now: Instant, after: Duration) {
        self.deadline = Some(now + after);
    }

    pub(crate) const fn cancel(&mut self) {
        self.deadline = None;
    }

    pub(crate) const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Consumes the deadline if it has passed.
    pub(crate) fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_after_deadline() {
        let clock = ManualClock::new();
        let mut timer = StatusTimer::default();
        timer.schedule(clock.now(), Duration::from_secs(10));

        clock.advance(Duration::from_millis(9_999));
        assert!(!timer.fire(clock.now()));

        clock.advance(Duration::from_millis(1));
        assert!(timer.fire(clock.now()));
        assert!(!timer.fire(clock.now()));
    }

    #[test]
    fn rescheduling_replaces_deadline() {
        let clock = ManualClock::new();
        let mut timer = StatusTimer::default();
        timer.schedule(clock.now(), Duration::from_secs(10));

        clock.advance(Duration::from_secs(8));
        timer.schedule(clock.now(), Duration::from_secs(10));

        clock.advance(Duration::from_secs(8));
        assert!(!timer.fire(clock.now()));
        clock.advance(Duration::from_secs(2));
        assert!(timer.fire(clock.now()));
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let clock = ManualClock::new();
        let mut timer = StatusTimer::default();
        timer.schedule(clock.now(), Duration::ZERO);
        timer.cancel();

        assert_eq!(timer.deadline(), None);
        assert!(!timer.fire(clock.now()));
    }

    #[test]
    fn clones_share_time() {
        let clock = ManualClock::new();
        let other = clock.clone();
        let before = other.now();
        clock.advance(Duration::from_secs(3));
        assert_eq!(other.now() - before, Duration::from_secs(3));
    }
}
