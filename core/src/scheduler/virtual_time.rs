use crate::prelude::Millis;
use crate::scheduler::{Scheduler, TimerId};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

struct Entry<T> {
    due: Millis,
    seq: u64,
    id: TimerId,
    period: Option<Millis>,
    task: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    // Reversed so the max-heap yields the earliest (due, seq) first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Deterministic timer queue over virtual milliseconds.
///
/// Ties on the due time resolve in scheduling order. Periodic timers re-arm
/// from their nominal due time, so a late drain does not accumulate drift.
pub struct VirtualScheduler<T> {
    now: Millis,
    queue: BinaryHeap<Entry<T>>,
    live: HashSet<TimerId>,
    next_id: u64,
    next_seq: u64,
}

impl<T: Clone> VirtualScheduler<T> {
    pub fn new() -> Self {
        Self {
            now: 0,
            queue: BinaryHeap::new(),
            live: HashSet::new(),
            next_id: 0,
            next_seq: 0,
        }
    }

    fn push(&mut self, id: TimerId, due: Millis, period: Option<Millis>, task: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Entry {
            due,
            seq,
            id,
            period,
            task,
        });
    }

    fn allocate(&mut self) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.live.insert(id);
        id
    }

    /// Due time of the next live task, if any.
    pub fn next_due(&mut self) -> Option<Millis> {
        while let Some(entry) = self.queue.peek() {
            if self.live.contains(&entry.id) {
                return Some(entry.due);
            }
            self.queue.pop();
        }
        None
    }
}

impl<T: Clone> Default for VirtualScheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Scheduler<T> for VirtualScheduler<T> {
    fn now(&self) -> Millis {
        self.now
    }

    fn after(&mut self, delay: Millis, task: T) -> TimerId {
        let id = self.allocate();
        let due = self.now.saturating_add(delay);
        self.push(id, due, None, task);
        id
    }

    fn every(&mut self, interval: Millis, task: T) -> TimerId {
        let interval = interval.max(1);
        let id = self.allocate();
        let due = self.now.saturating_add(interval);
        self.push(id, due, Some(interval), task);
        id
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        self.live.remove(&id)
    }

    fn pop_due(&mut self, until: Millis) -> Option<(TimerId, T)> {
        if self.next_due()? > until {
            return None;
        }
        let entry = self.queue.pop()?;
        self.now = self.now.max(entry.due);
        match entry.period {
            Some(period) => {
                let next = entry.due.saturating_add(period);
                self.push(entry.id, next, Some(period), entry.task.clone());
            }
            None => {
                self.live.remove(&entry.id);
            }
        }
        Some((entry.id, entry.task))
    }

    fn advance_clock(&mut self, to: Millis) {
        self.now = self.now.max(to);
    }

    fn pending(&self) -> usize {
        self.live.len()
    }
}
