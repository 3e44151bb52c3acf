//! Debounce bursts
//!
//! A burst opens on the first qualifying event and closes when its single
//! debounce timer fires. Every native event delivered in between is kept,
//! in delivery order, as an interim event.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use media_emitter::{Event, ListenerId, TimerId};
use parking_lot::Mutex;

/// An event recorded while a burst was open
#[derive(Debug, Clone)]
pub struct InterimEvent {
    /// Scheduler time when the event was recorded, in milliseconds
    pub time: u64,

    /// The recorded event
    pub event: Event,
}

impl InterimEvent {
    pub fn event_type(&self) -> &str {
        &self.event.event_type
    }
}

/// Shared log of interim events
///
/// Order is sequence order; equal timestamps are expected.
#[derive(Debug, Clone, Default)]
pub struct InterimLog {
    events: Arc<Mutex<Vec<InterimEvent>>>,
}

impl InterimLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, time: u64, event: Event) {
        self.events.lock().push(InterimEvent { time, event });
    }

    /// Record an event that was delivered before everything logged so far
    pub fn prepend(&self, time: u64, event: Event) {
        self.events.lock().insert(0, InterimEvent { time, event });
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Copy of the events recorded so far
    pub fn snapshot(&self) -> Vec<InterimEvent> {
        self.events.lock().clone()
    }

    /// Move the recorded events out, leaving the log empty
    pub fn take(&self) -> Vec<InterimEvent> {
        std::mem::take(&mut *self.events.lock())
    }
}

static NEXT_BURST_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one burst, used to match a firing timer to its burst
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BurstId(u64);

impl BurstId {
    pub fn next() -> Self {
        BurstId(NEXT_BURST_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// An open burst
#[derive(Debug, Clone)]
pub struct Burst {
    pub id: BurstId,

    /// The pending debounce timer
    pub timer: TimerId,

    /// Catch-all listener recording native events into `log`
    pub catch_all: ListenerId,

    pub log: InterimLog,
}
