//! Timer schedule on a virtual clock
//!
//! Every delayed side effect (staggered ball introductions, draw ticks,
//! message auto-hide) is queued here as a `(due time, action)` pair. A single
//! driving loop pops due actions in order, moving the clock to each one's due
//! time, so tests can step time without waiting on a wall clock.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Duration;

struct Entry<A> {
    due: Duration,
    /// Insertion order, breaks ties between equal due times (FIFO)
    seq: u64,
    action: A,
}

impl<A> PartialEq for Entry<A> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<A> Eq for Entry<A> {}

impl<A> PartialOrd for Entry<A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<A> Ord for Entry<A> {
    // Reversed so the max-heap yields the earliest entry first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Pending actions ordered by due time
pub struct Schedule<A> {
    now: Duration,
    next_seq: u64,
    queue: BinaryHeap<Entry<A>>,
}

impl<A> Default for Schedule<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Schedule<A> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_seq: 0,
            queue: BinaryHeap::new(),
        }
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Queue an action to run `delay` after the current time
    pub fn after(&mut self, delay: Duration, action: A) {
        let entry = Entry {
            due: self.now + delay,
            seq: self.next_seq,
            action,
        };
        self.next_seq += 1;
        self.queue.push(entry);
    }

    /// Pop the earliest action due at or before `until`
    ///
    /// The clock moves to that action's due time, so anything it schedules
    /// is timed from when it was due rather than from the end of the frame.
    pub fn pop_until(&mut self, until: Duration) -> Option<A> {
        if self.queue.peek()?.due > until {
            return None;
        }
        let entry = self.queue.pop()?;
        self.now = self.now.max(entry.due);
        Some(entry.action)
    }

    /// Move the clock forward to `time` (never backwards)
    pub fn advance_to(&mut self, time: Duration) {
        self.now = self.now.max(time);
    }
}
