//! Timer scheduling
//!
//! The [`Scheduler`] trait is the clock a [`Player`](crate::Player) uses for
//! `set_timeout`/`clear_timeout` and for timestamps. [`ManualClock`] is a
//! virtual-time implementation: nothing fires until the owner calls
//! [`ManualClock::tick`], which makes timer-driven behavior deterministic.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

/// One-shot timer callback
pub type TimerCallback = Box<dyn FnOnce() + Send>;

/// Handle to a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    /// Wrap an id minted by a custom [`Scheduler`]
    pub fn from_raw(raw: u64) -> Self {
        TimerId(raw)
    }

    /// Raw numeric value, for logging
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// Source of time and one-shot timers
pub trait Scheduler: Send + Sync {
    /// Current time in milliseconds
    fn now(&self) -> u64;

    /// Run `callback` once, `delay_ms` from now
    fn set_timeout(&self, delay_ms: u64, callback: TimerCallback) -> TimerId;

    /// Cancel a timer; returns whether it was still pending
    fn clear_timeout(&self, id: TimerId) -> bool;
}

#[derive(Default)]
struct ClockState {
    now: u64,
    next_id: u64,
    /// (due, id) -> callback; BTreeMap order is firing order
    timers: BTreeMap<(u64, u64), TimerCallback>,
    due_by_id: HashMap<u64, u64>,
}

/// Virtual-time scheduler
///
/// Time starts at 0 and only moves forward through [`tick`](Self::tick).
/// Timers due at the same instant fire in the order they were scheduled.
///
/// # Example
///
/// ```rust
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
/// use media_emitter::{ManualClock, Scheduler};
///
/// let clock = ManualClock::new();
/// let fired = Arc::new(AtomicBool::new(false));
///
/// let flag = Arc::clone(&fired);
/// clock.set_timeout(5, Box::new(move || flag.store(true, Ordering::SeqCst)));
///
/// clock.tick(4);
/// assert!(!fired.load(Ordering::SeqCst));
/// clock.tick(1);
/// assert!(fired.load(Ordering::SeqCst));
/// assert_eq!(clock.now(), 5);
/// ```
#[derive(Clone, Default)]
pub struct ManualClock {
    state: Arc<Mutex<ClockState>>,
}

impl ManualClock {
    /// Create a clock at time 0 with no timers
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance time by `ms`, firing every timer that falls due
    ///
    /// The clock reads each timer's due time while its callback runs.
    /// Timers scheduled by a callback fire in the same call if they fall
    /// due before the end of the window.
    pub fn tick(&self, ms: u64) {
        let target = self.state.lock().now.saturating_add(ms);

        loop {
            let callback = {
                let mut state = self.state.lock();
                let next_key = state
                    .timers
                    .keys()
                    .next()
                    .copied()
                    .filter(|(due, _)| *due <= target);

                match next_key {
                    Some(key) => {
                        state.due_by_id.remove(&key.1);
                        state.now = key.0;
                        trace!(timer = key.1, at = key.0, "firing timer");
                        state.timers.remove(&key)
                    }
                    None => {
                        state.now = target;
                        break;
                    }
                }
            };

            if let Some(callback) = callback {
                callback();
            }
        }
    }

    /// Number of timers still waiting to fire
    pub fn pending(&self) -> usize {
        self.state.lock().timers.len()
    }
}

impl Scheduler for ManualClock {
    fn now(&self) -> u64 {
        self.state.lock().now
    }

    fn set_timeout(&self, delay_ms: u64, callback: TimerCallback) -> TimerId {
        let mut state = self.state.lock();
        state.next_id += 1;
        let id = state.next_id;
        let due = state.now.saturating_add(delay_ms);
        state.timers.insert((due, id), callback);
        state.due_by_id.insert(id, due);
        TimerId(id)
    }

    fn clear_timeout(&self, id: TimerId) -> bool {
        let mut state = self.state.lock();
        match state.due_by_id.remove(&id.0) {
            Some(due) => state.timers.remove(&(due, id.0)).is_some(),
            None => false,
        }
    }
}

impl std::fmt::Debug for ManualClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ManualClock")
            .field("now", &state.now)
            .field("pending", &state.timers.len())
            .finish()
    }
}
