//! Timer capability used by the sonar loop.
//!
//! Scheduled work is plain data (`T`), so a scheduler never runs code on its
//! own: the owner drains due tasks with [`Scheduler::pop_due`] and dispatches
//! them one at a time.

pub mod virtual_time;

pub use virtual_time::VirtualScheduler;

use crate::prelude::Millis;
use serde::{Deserialize, Serialize};

/// Handle for a pending one-shot or periodic timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(pub u64);

pub trait Scheduler<T> {
    /// Current scheduler time.
    fn now(&self) -> Millis;

    /// Fires `task` once, `delay` after now.
    fn after(&mut self, delay: Millis, task: T) -> TimerId;

    /// Fires `task` every `interval`, first one interval after now.
    fn every(&mut self, interval: Millis, task: T) -> TimerId;

    /// Returns `false` when the timer already fired (one-shot) or was cancelled.
    fn cancel(&mut self, id: TimerId) -> bool;

    /// Removes the earliest task due at or before `until`, moving the clock
    /// to its due time.
    fn pop_due(&mut self, until: Millis) -> Option<(TimerId, T)>;

    /// Moves the clock forward; never backwards.
    fn advance_clock(&mut self, to: Millis);

    fn pending(&self) -> usize;
}
