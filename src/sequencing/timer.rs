//! Tick sources for the step clock.
//!
//! The clock never sleeps or spawns anything itself. It arms a [`Timer`]
//! with the step interval and asks it, whenever the owner polls, whether a
//! tick is due. [`IntervalTimer`] reads the wall clock; [`ManualTimer`] only
//! moves when told to, so tests can step time deterministically.

use std::time::{Duration, Instant};

pub trait Timer {
    /// Start firing every `interval`, measured from now. Replaces any
    /// previous schedule.
    fn arm(&mut self, interval: Duration);

    /// Stop firing.
    fn disarm(&mut self);

    /// Consume one due tick. Returns false when nothing is due.
    fn fire(&mut self) -> bool;

    /// Time left until the next tick, or `None` while disarmed.
    fn until_next(&self) -> Option<Duration>;
}

/// Wall-clock timer with `setInterval` semantics: ticks missed while the
/// owner was busy are dropped rather than replayed in a burst.
#[derive(Debug, Default)]
pub struct IntervalTimer {
    interval: Duration,
    next: Option<Instant>,
}

impl IntervalTimer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Timer for IntervalTimer {
    fn arm(&mut self, interval: Duration) {
        self.interval = interval;
        self.next = Some(Instant::now() + interval);
    }

    fn disarm(&mut self) {
        self.next = None;
    }

    fn fire(&mut self) -> bool {
        let Some(next) = self.next else {
            return false;
        };
        let now = Instant::now();
        if now < next {
            return false;
        }

        // Keep the grid anchored to the original deadline unless we fell
        // more than a whole interval behind.
        let mut following = next + self.interval;
        if following <= now {
            following = now + self.interval;
        }
        self.next = Some(following);
        true
    }

    fn until_next(&self) -> Option<Duration> {
        self.next
            .map(|next| next.saturating_duration_since(Instant::now()))
    }
}

/// Timer driven by explicit `advance` calls.
#[derive(Debug, Default)]
pub struct ManualTimer {
    interval: Option<Duration>,
    now: Duration,
    next: Duration,
    arm_count: usize,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward. Due ticks are delivered by `fire`.
    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }

    /// Interval currently armed.
    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    pub fn is_armed(&self) -> bool {
        self.interval.is_some()
    }

    /// How many times the timer has been (re)armed.
    pub fn arm_count(&self) -> usize {
        self.arm_count
    }
}

impl Timer for ManualTimer {
    fn arm(&mut self, interval: Duration) {
        self.interval = Some(interval);
        self.next = self.now + interval;
        self.arm_count += 1;
    }

    fn disarm(&mut self) {
        self.interval = None;
    }

    fn fire(&mut self) -> bool {
        match self.interval {
            Some(interval) if self.now >= self.next => {
                self.next += interval;
                true
            }
            _ => false,
        }
    }

    fn until_next(&self) -> Option<Duration> {
        self.interval
            .map(|_| self.next.saturating_sub(self.now))
    }
}
