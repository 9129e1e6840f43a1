//! Ticker — a single cancelable periodic deadline.
//!
//! The ticker owns no thread. A host loop asks it which deadlines have
//! passed and runs one tick for each. Holding the schedule as one
//! `Option<Instant>` means re-arming replaces the old schedule instead of
//! adding a second one, and cancellation is visible the moment it returns.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Ticker {
    period: Duration,
    next_due: Option<Instant>,
}

impl Ticker {
    /// A disarmed ticker firing every `period` once armed.
    ///
    /// # Panics
    /// If `period` is zero.
    pub fn new(period: Duration) -> Self {
        assert!(!period.is_zero(), "ticker period must be non-zero");
        Self {
            period,
            next_due: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Arm (or re-arm) the schedule. The first tick is due one period after `now`.
    pub fn arm(&mut self, now: Instant) {
        self.next_due = Some(now + self.period);
    }

    /// Drop the schedule. No further ticks fire until re-armed.
    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    /// Consume one deadline if it has passed by `now`.
    ///
    /// Returns true when the caller should run a tick. Call repeatedly to
    /// catch up on several missed deadlines; each call consumes at most one.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if due <= now => {
                self.next_due = Some(due + self.period);
                true
            }
            _ => false,
        }
    }

    /// Time left until the next deadline, `None` when disarmed.
    pub fn until_next(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const P: Duration = Duration::from_millis(50);

    fn drain(t: &mut Ticker, now: Instant) -> usize {
        let mut n = 0;
        while t.fire_if_due(now) {
            n += 1;
        }
        n
    }

    #[test]
    fn disarmed_never_fires() {
        let mut t = Ticker::new(P);
        let now = Instant::now();
        assert!(!t.fire_if_due(now + Duration::from_secs(10)));
        assert_eq!(t.until_next(now), None);
    }

    #[test]
    fn fires_once_per_elapsed_period() {
        let mut t = Ticker::new(P);
        let t0 = Instant::now();
        t.arm(t0);
        assert_eq!(drain(&mut t, t0 + Duration::from_millis(49)), 0);
        assert_eq!(drain(&mut t, t0 + Duration::from_millis(50)), 1);
        assert_eq!(drain(&mut t, t0 + Duration::from_millis(500)), 9);
    }

    #[test]
    fn rearm_replaces_schedule() {
        let mut t = Ticker::new(P);
        let t0 = Instant::now();
        t.arm(t0);
        t.arm(t0);
        assert_eq!(drain(&mut t, t0 + Duration::from_millis(500)), 10);
    }

    #[test]
    fn cancel_stops_future_ticks() {
        let mut t = Ticker::new(P);
        let t0 = Instant::now();
        t.arm(t0);
        t.cancel();
        assert!(!t.is_armed());
        assert_eq!(drain(&mut t, t0 + Duration::from_secs(1)), 0);
    }

    #[test]
    fn until_next_counts_down() {
        let mut t = Ticker::new(P);
        let t0 = Instant::now();
        t.arm(t0);
        assert_eq!(t.until_next(t0 + Duration::from_millis(20)), Some(Duration::from_millis(30)));
        assert_eq!(t.until_next(t0 + Duration::from_millis(80)), Some(Duration::ZERO));
    }

    #[test]
    #[should_panic(expected = "non-zero")]
    fn zero_period_panics() {
        let _ = Ticker::new(Duration::ZERO);
    }
}
