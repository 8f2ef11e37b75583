use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use reel_core::TimerId;

/// Pending timers by id. Scheduling an id that is already pending moves its
/// deadline instead of adding a second one.
#[derive(Debug, Default)]
pub struct TimerQueue {
    deadlines: BTreeMap<TimerId, Instant>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, timer: TimerId, after: Duration, now: Instant) {
        self.deadlines.insert(timer, now + after);
    }

    pub fn cancel(&mut self, timer: TimerId) {
        self.deadlines.remove(&timer);
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadlines.values().min().copied()
    }

    /// Removes and returns every timer due at `now`, earliest first.
    pub fn pop_due(&mut self, now: Instant) -> Vec<TimerId> {
        let mut due: Vec<(Instant, TimerId)> = self
            .deadlines
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(timer, deadline)| (*deadline, *timer))
            .collect();
        due.sort();
        for (_, timer) in &due {
            self.deadlines.remove(timer);
        }
        due.into_iter().map(|(_, timer)| timer).collect()
    }
}
