//! Future event list
//!
//! The model never advances time itself. It reads the clock and registers
//! future events through [`EventScheduler`]; [`Calendar`] is the binary-heap
//! implementation the replication runner drives.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Clock and scheduling access handed to the model.
pub trait EventScheduler<E> {
    /// Current simulated time.
    fn now(&self) -> f64;

    /// Register `event` to fire at `time`.
    fn schedule_at(&mut self, time: f64, event: E);
}

#[derive(Debug)]
struct Scheduled<E> {
    time: f64,
    /// Insertion order; breaks ties so equal times fire FIFO
    seq: u64,
    event: E,
}

impl<E> PartialEq for Scheduled<E> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<E> Eq for Scheduled<E> {}

impl<E> PartialOrd for Scheduled<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for Scheduled<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap: reverse so the earliest event is on top
        self.time
            .total_cmp(&other.time)
            .then(self.seq.cmp(&other.seq))
            .reverse()
    }
}

/// Min-heap of future events ordered by time, then insertion.
///
/// # Example
/// ```
/// use seat_simulator_core_rs::scheduler::{Calendar, EventScheduler};
///
/// let mut calendar = Calendar::new();
/// calendar.schedule_at(2.0, "late");
/// calendar.schedule_at(1.0, "early");
///
/// assert_eq!(calendar.pop_next(), Some((1.0, "early")));
/// assert_eq!(calendar.now(), 1.0);
/// assert_eq!(calendar.pop_next(), Some((2.0, "late")));
/// assert_eq!(calendar.pop_next(), None);
/// ```
#[derive(Debug)]
pub struct Calendar<E> {
    now: f64,
    next_seq: u64,
    queue: BinaryHeap<Scheduled<E>>,
}

impl<E> Default for Calendar<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Calendar<E> {
    pub fn new() -> Self {
        Self {
            now: 0.0,
            next_seq: 0,
            queue: BinaryHeap::new(),
        }
    }

    /// Time of the next event without removing it.
    pub fn peek_time(&self) -> Option<f64> {
        self.queue.peek().map(|s| s.time)
    }

    /// Remove the earliest event and advance the clock to its time.
    pub fn pop_next(&mut self) -> Option<(f64, E)> {
        let scheduled = self.queue.pop()?;
        self.now = scheduled.time;
        Some((scheduled.time, scheduled.event))
    }

    /// Drop every pending event and rewind the clock to zero.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.now = 0.0;
        self.next_seq = 0;
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl<E> EventScheduler<E> for Calendar<E> {
    fn now(&self) -> f64 {
        self.now
    }

    fn schedule_at(&mut self, time: f64, event: E) {
        debug_assert!(time >= self.now, "cannot schedule into the past");
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Scheduled { time, seq, event });
    }
}
