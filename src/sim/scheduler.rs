//! Deferred event queue
//!
//! Events are scheduled for a simulation time and executed by [`Scheduler::drain_due`].
//! Two buffers keep a drain finite: due events are moved into the draining
//! batch up front, and anything scheduled while that batch runs lands in the
//! pending buffer for a later drain, even if it is already due.
//!
//! Ordering: earlier time first, then scheduling order. Event kind never
//! affects ordering.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Handle to a scheduled event (valid until it executes or is cancelled)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(u64);

/// A scheduled event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pending<E> {
    pub id: EventId,
    /// Simulation time (seconds) at which the event becomes due
    pub time: f64,
    pub event: E,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scheduler<E> {
    /// Time of the most recent drain
    now: f64,
    next_id: u64,
    /// Waiting events, sorted by (time, id)
    pending: Vec<Pending<E>>,
    /// Batch owned by the drain in progress
    draining: VecDeque<Pending<E>>,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Self {
            now: 0.0,
            next_id: 0,
            pending: Vec::new(),
            draining: VecDeque::new(),
        }
    }

    /// Time passed to the most recent drain
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Schedule for the next drain
    pub fn schedule(&mut self, event: E) -> EventId {
        self.schedule_at(self.now, event)
    }

    /// Schedule `delay` seconds after the most recent drain
    pub fn schedule_in(&mut self, delay: f64, event: E) -> EventId {
        let delay = if delay.is_finite() { delay.max(0.0) } else { 0.0 };
        self.schedule_at(self.now + delay, event)
    }

    /// Schedule at an absolute simulation time
    pub fn schedule_at(&mut self, time: f64, event: E) -> EventId {
        let time = if time.is_nan() { self.now } else { time };
        let id = EventId(self.next_id);
        self.next_id += 1;

        // Ids only grow, so inserting after every event with time <= ours keeps FIFO
        let index = self.pending.partition_point(|p| p.time <= time);
        self.pending.insert(index, Pending { id, time, event });
        id
    }

    /// Mutable access to a not-yet-executed event's payload
    pub fn get_mut(&mut self, id: EventId) -> Option<&mut E> {
        self.pending
            .iter_mut()
            .chain(self.draining.iter_mut())
            .find(|p| p.id == id)
            .map(|p| &mut p.event)
    }

    /// Withdraw an event before it runs. Returns it if it was still queued.
    pub fn cancel(&mut self, id: EventId) -> Option<E> {
        if let Some(index) = self.pending.iter().position(|p| p.id == id) {
            return Some(self.pending.remove(index).event);
        }
        let index = self.draining.iter().position(|p| p.id == id)?;
        self.draining.remove(index).map(|p| p.event)
    }

    /// Whether `id` is still waiting to execute
    pub fn contains(&self, id: EventId) -> bool {
        self.pending.iter().chain(self.draining.iter()).any(|p| p.id == id)
    }

    /// Number of queued events
    pub fn len(&self) -> usize {
        self.pending.len() + self.draining.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty() && self.draining.is_empty()
    }

    /// Queued events in execution order
    pub fn iter(&self) -> impl Iterator<Item = &Pending<E>> {
        self.draining.iter().chain(self.pending.iter())
    }

    /// Drop everything without executing (teardown)
    pub fn clear(&mut self) {
        self.pending.clear();
        self.draining.clear();
    }

    /// Execute every event due at `now`, in order.
    ///
    /// `execute` gets the scheduler back so it can schedule or cancel; newly
    /// scheduled events wait for a later drain. Returns the number executed.
    pub fn drain_due<F>(&mut self, now: f64, mut execute: F) -> usize
    where
        F: FnMut(&mut Self, Pending<E>),
    {
        if now.is_finite() && now > self.now {
            self.now = now;
        }

        let due = self.pending.partition_point(|p| p.time <= self.now);
        self.draining.extend(self.pending.drain(..due));

        let mut executed = 0;
        while let Some(next) = self.draining.pop_front() {
            execute(self, next);
            executed += 1;
        }
        executed
    }
}
