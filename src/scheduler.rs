/*
 *  scheduler.rs
 *
 *  idlewall - full-screen idle displays
 *  (c) 2026 idlewall contributors
 *
 *  Cooperative one-shot timers for the main loop
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

/// Handle returned by [`Scheduler::schedule`], used to cancel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

struct Entry<T> {
    deadline: Instant,
    seq: u64,
    payload: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    // same deadline: first scheduled fires first
    fn cmp(&self, other: &Self) -> Ordering {
        self.deadline.cmp(&other.deadline).then(self.seq.cmp(&other.seq))
    }
}

/// Single-threaded timer queue.
///
/// Every timer fires once; periodic work re-arms itself after running.
/// Nothing here blocks: the event loop asks for [`Scheduler::next_deadline`]
/// to know how long it may sleep and calls [`Scheduler::drain_due`] on wake.
pub struct Scheduler<T> {
    queue: BinaryHeap<Reverse<Entry<T>>>,
    next_seq: u64,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self { queue: BinaryHeap::new(), next_seq: 0 }
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a one-shot timer `delay` after `now`
    pub fn schedule(&mut self, now: Instant, delay: Duration, payload: T) -> TimerHandle {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Reverse(Entry { deadline: now + delay, seq, payload }));
        TimerHandle(seq)
    }

    /// Disarm a timer. False if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.queue.len();
        self.queue.retain(|Reverse(e)| e.seq != handle.0);
        self.queue.len() != before
    }

    /// Earliest pending deadline
    pub fn next_deadline(&self) -> Option<Instant> {
        self.queue.peek().map(|Reverse(e)| e.deadline)
    }

    /// Remove and return every timer due at `now`, earliest first.
    /// Timers armed while the caller processes the result are not included.
    pub fn drain_due(&mut self, now: Instant) -> Vec<(TimerHandle, T)> {
        let mut due = Vec::new();
        while let Some(Reverse(head)) = self.queue.peek() {
            if head.deadline > now {
                break;
            }
            if let Some(Reverse(entry)) = self.queue.pop() {
                due.push((TimerHandle(entry.seq), entry.payload));
            }
        }
        due
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_in_deadline_order() {
        let t0 = Instant::now();
        let mut s = Scheduler::new();
        s.schedule(t0, Duration::from_millis(30), "c");
        s.schedule(t0, Duration::from_millis(10), "a");
        s.schedule(t0, Duration::from_millis(20), "b");

        assert_eq!(s.next_deadline(), Some(t0 + Duration::from_millis(10)));
        assert!(s.drain_due(t0).is_empty());

        let due: Vec<_> = s.drain_due(t0 + Duration::from_millis(25)).into_iter().map(|(_, p)| p).collect();
        assert_eq!(due, vec!["a", "b"]);
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn same_deadline_is_fifo() {
        let t0 = Instant::now();
        let mut s = Scheduler::new();
        for i in 0..5 {
            s.schedule(t0, Duration::from_millis(5), i);
        }
        let due: Vec<_> = s.drain_due(t0 + Duration::from_millis(5)).into_iter().map(|(_, p)| p).collect();
        assert_eq!(due, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn cancel_disarms_once() {
        let t0 = Instant::now();
        let mut s = Scheduler::new();
        let keep = s.schedule(t0, Duration::ZERO, 1);
        let drop = s.schedule(t0, Duration::ZERO, 2);

        assert!(s.cancel(drop));
        assert!(!s.cancel(drop));

        let due = s.drain_due(t0);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].0, keep);
        assert!(!s.cancel(keep));
        assert!(s.is_empty());
        assert_eq!(s.next_deadline(), None);
    }

    #[test]
    fn rearmed_timers_wait_for_next_drain() {
        let t0 = Instant::now();
        let mut s = Scheduler::new();
        s.schedule(t0, Duration::ZERO, ());
        for _ in s.drain_due(t0) {
            s.schedule(t0, Duration::ZERO, ());
        }
        assert_eq!(s.len(), 1);
    }
}
