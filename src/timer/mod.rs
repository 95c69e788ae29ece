//! Absolute-deadline timer service.
//!
//! Timers are armed for a point in time and fire when the owner advances the
//! clock past it. Nothing here reads a wall clock: the switcher decides what
//! "now" is, which keeps firing order deterministic and testable with a fake
//! clock.
//!
//! # Example
//!
//! ```rust
//! use wallswitch::timer::TimerQueue;
//! use chrono::{Duration, Utc};
//!
//! let start = Utc::now();
//! let mut timers = TimerQueue::new();
//! let late = timers.arm(start + Duration::seconds(5), "late");
//! let early = timers.arm(start + Duration::seconds(1), "early");
//!
//! assert!(timers.pop_due(start).is_none());
//! assert!(timers.cancel(late));
//!
//! let fired = timers.pop_due(start + Duration::seconds(10)).unwrap();
//! assert_eq!(fired.id, early);
//! assert_eq!(fired.payload, "early");
//! assert!(timers.is_empty());
//! ```

use crate::core::Timestamp;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Opaque handle to an armed timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(u64);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// A timer that reached its deadline.
#[derive(Clone, Debug, PartialEq)]
pub struct FiredTimer<T> {
    pub id: TimerId,
    /// The deadline the timer was armed for (not the time it was popped).
    pub at: Timestamp,
    pub payload: T,
}

/// Pending timers ordered by deadline, then by arm order.
#[derive(Debug)]
pub struct TimerQueue<T> {
    next_id: u64,
    pending: BTreeMap<(Timestamp, TimerId), T>,
    deadlines: HashMap<TimerId, Timestamp>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            pending: BTreeMap::new(),
            deadlines: HashMap::new(),
        }
    }

    /// Arm a timer firing at `at`.
    ///
    /// Deadlines already in the past fire on the next `pop_due`.
    pub fn arm(&mut self, at: Timestamp, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.insert((at, id), payload);
        self.deadlines.insert(id, at);
        id
    }

    /// Cancel a timer.
    ///
    /// Returns `false` if the timer already fired or was already canceled;
    /// canceling twice is harmless.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.deadlines.remove(&id) {
            Some(at) => self.pending.remove(&(at, id)).is_some(),
            None => false,
        }
    }

    pub fn is_armed(&self, id: TimerId) -> bool {
        self.deadlines.contains_key(&id)
    }

    /// Earliest outstanding deadline.
    pub fn next_deadline(&self) -> Option<Timestamp> {
        self.pending.keys().next().map(|(at, _)| *at)
    }

    /// Remove and return the earliest timer whose deadline is at or before
    /// `now`.
    pub fn pop_due(&mut self, now: Timestamp) -> Option<FiredTimer<T>> {
        let entry = self.pending.first_entry()?;
        if entry.key().0 > now {
            return None;
        }
        let ((at, id), payload) = entry.remove_entry();
        self.deadlines.remove(&id);
        Some(FiredTimer { id, at, payload })
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
