//! Single-threaded cooperative timer queue with a virtual clock.
//!
//! Nothing here runs on its own: the owner calls [`Scheduler::pop_due`] in a
//! loop to fire timers in deadline order, dispatches each one, then calls
//! [`Scheduler::settle`] to move the clock to the requested instant. Because
//! every firing is handled to completion before the next is popped, timer
//! callbacks and user interactions are always serialized.
//!
//! Repeating timers follow interval semantics: each deadline is the previous
//! deadline plus the period, independent of when anything else happened.
//!
//! Cancellation is lazy. Cancelled entries stay in the heap and are skipped
//! when they surface.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

/// Opaque handle to an armed timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// A timer that came due.
#[derive(Debug, Clone, PartialEq)]
pub struct Fired<T> {
    pub id: TimerId,
    pub payload: T,
    /// Clock value at which it fired.
    pub at: u64,
}

#[derive(Debug)]
struct Timer<T> {
    payload: T,
    deadline: u64,
    every: Option<u64>,
}

#[derive(Debug)]
pub struct Scheduler<T> {
    now: u64,
    next_id: u64,
    seq: u64,
    // (deadline, insertion order, id); the sequence keeps equal deadlines FIFO.
    queue: BinaryHeap<Reverse<(u64, u64, TimerId)>>,
    timers: HashMap<TimerId, Timer<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: 0,
            next_id: 0,
            seq: 0,
            queue: BinaryHeap::new(),
            timers: HashMap::new(),
        }
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    /// Fire once, `delay` ms from now.
    pub fn schedule_once(&mut self, delay: u64, payload: T) -> TimerId {
        self.insert(delay, None, payload)
    }

    /// Fire every `every` ms, starting `every` ms from now. Periods below
    /// 1 ms are raised to 1 ms so the queue always makes progress.
    pub fn schedule_repeating(&mut self, every: u64, payload: T) -> TimerId {
        let every = every.max(1);
        self.insert(every, Some(every), payload)
    }

    fn insert(&mut self, delay: u64, every: Option<u64>, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let deadline = self.now.saturating_add(delay);
        self.timers.insert(
            id,
            Timer {
                payload,
                deadline,
                every,
            },
        );
        self.push(deadline, id);
        id
    }

    fn push(&mut self, deadline: u64, id: TimerId) {
        self.queue.push(Reverse((deadline, self.seq, id)));
        self.seq += 1;
    }

    /// Disarm a timer. Safe to call for unknown or already-cancelled ids.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.timers.remove(&id).is_some()
    }

    pub fn is_armed(&self, id: TimerId) -> bool {
        self.timers.contains_key(&id)
    }

    /// Number of armed timers.
    pub fn active(&self) -> usize {
        self.timers.len()
    }

    /// Deadline of the earliest armed timer.
    pub fn next_deadline(&mut self) -> Option<u64> {
        self.discard_stale();
        self.queue.peek().map(|Reverse((deadline, _, _))| *deadline)
    }

    fn discard_stale(&mut self) {
        while let Some(Reverse((deadline, _, id))) = self.queue.peek() {
            match self.timers.get(id) {
                Some(timer) if timer.deadline == *deadline => break,
                _ => {
                    self.queue.pop();
                }
            }
        }
    }

    /// Move the clock forward to `until` once nothing else is due.
    pub fn settle(&mut self, until: u64) {
        self.now = self.now.max(until);
    }
}

impl<T: Clone> Scheduler<T> {
    /// Fire the earliest timer whose deadline is at or before `until`.
    ///
    /// The clock moves to that timer's deadline. Repeating timers are re-armed
    /// one period after the deadline that just fired.
    pub fn pop_due(&mut self, until: u64) -> Option<Fired<T>> {
        self.discard_stale();
        let Reverse((deadline, _, id)) = *self.queue.peek()?;
        if deadline > until {
            return None;
        }
        self.queue.pop();
        self.now = self.now.max(deadline);

        let timer = self.timers.get_mut(&id)?;
        let payload = timer.payload.clone();
        let every = timer.every;
        match every {
            Some(every) => {
                let next = deadline.saturating_add(every);
                timer.deadline = next;
                self.push(next, id);
            }
            None => {
                self.timers.remove(&id);
            }
        }
        Some(Fired {
            id,
            payload,
            at: deadline,
        })
    }

    /// Fire everything due up to `until`, in order, then settle there.
    pub fn advance_to(&mut self, until: u64) -> Vec<Fired<T>> {
        let mut fired = Vec::new();
        while let Some(f) = self.pop_due(until) {
            fired.push(f);
        }
        self.settle(until);
        fired
    }
}

/// The timer surface a self-contained widget needs.
///
/// The page routes firings back to the widget that armed them; a bare
/// `Scheduler<()>` implements it for stand-alone use.
pub trait TimerHost {
    fn arm_repeating(&mut self, every_ms: u64) -> TimerId;
    fn disarm(&mut self, id: TimerId) -> bool;
}

impl TimerHost for Scheduler<()> {
    fn arm_repeating(&mut self, every_ms: u64) -> TimerId {
        self.schedule_repeating(every_ms, ())
    }

    fn disarm(&mut self, id: TimerId) -> bool {
        self.cancel(id)
    }
}
