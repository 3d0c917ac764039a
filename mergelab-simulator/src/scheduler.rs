//! The discrete-event scheduler: sole owner of virtual time.
//!
//! Events are (time, label, callback) triples kept in a min-heap. Callbacks
//! run strictly in time order; at equal times they run in registration order
//! (FIFO tie-break via a sequence counter), which keeps replays deterministic.
//! Callbacks receive `&mut EventSimulator` so they can read the clock and
//! schedule further events, and return a `Result` so a failing callback
//! aborts the run instead of being silently dropped.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use tracing::trace;

use mergelab_core::error::SimulationError;
use mergelab_core::time::{SimTime, VirtualClock};

type EventCallback = Box<dyn FnOnce(&mut EventSimulator) -> Result<(), SimulationError>>;

struct ScheduledEvent {
    at: SimTime,
    seq: u64,
    label: &'static str,
    callback: EventCallback,
}

impl PartialEq for ScheduledEvent {
    fn eq(&self, other: &Self) -> bool {
        self.at == other.at && self.seq == other.seq
    }
}

impl Eq for ScheduledEvent {}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.at, self.seq).cmp(&(other.at, other.seq))
    }
}

/// Virtual-time event simulator.
///
/// Single-threaded and cooperative: all waiting is expressed as a registered
/// future callback, never as a blocked thread.
pub struct EventSimulator {
    clock: VirtualClock,
    queue: BinaryHeap<Reverse<ScheduledEvent>>,
    next_seq: u64,
    executed: u64,
}

impl EventSimulator {
    /// Creates a simulator whose clock starts at the given virtual time.
    pub fn new(start: SimTime) -> Self {
        Self {
            clock: VirtualClock::new(start),
            queue: BinaryHeap::new(),
            next_seq: 0,
            executed: 0,
        }
    }

    /// Current virtual time. Monotonically non-decreasing.
    #[inline]
    pub fn now(&self) -> SimTime {
        self.clock.now()
    }

    /// Registers a one-shot callback at an absolute virtual time.
    ///
    /// Times in the past are clamped to the current time; the clock never
    /// moves backwards. There is no cancellation: a registered callback
    /// will fire unless the simulator itself is dropped.
    pub fn schedule_at(
        &mut self,
        at: SimTime,
        label: &'static str,
        callback: impl FnOnce(&mut EventSimulator) -> Result<(), SimulationError> + 'static,
    ) {
        let at = at.max(self.now());
        let seq = self.next_seq;
        self.next_seq += 1;
        trace!(at, seq, label, "scheduled event");
        self.queue.push(Reverse(ScheduledEvent {
            at,
            seq,
            label,
            callback: Box::new(callback),
        }));
    }

    /// Number of callbacks still pending.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Number of callbacks executed so far.
    pub fn executed(&self) -> u64 {
        self.executed
    }

    /// Runs until the event queue is empty. Diverges on self-rescheduling
    /// workloads; use [`run_until`](Self::run_until) to bound those.
    pub fn run(&mut self) -> Result<(), SimulationError> {
        self.run_until(SimTime::MAX)
    }

    /// Runs every event scheduled at or before `limit`, then stops. Events
    /// past the limit stay queued.
    pub fn run_until(&mut self, limit: SimTime) -> Result<(), SimulationError> {
        loop {
            match self.queue.peek() {
                Some(Reverse(event)) if event.at <= limit => {}
                _ => return Ok(()),
            }
            if let Some(Reverse(event)) = self.queue.pop() {
                self.clock.advance_to(event.at);
                trace!(at = event.at, label = event.label, "firing event");
                (event.callback)(self)?;
                self.executed += 1;
            }
        }
    }
}
