//! Listener registration and event dispatch
//!
//! `Emitter` is a cheap-to-clone handle over a shared listener table. Every
//! registration gets a unique [`ListenerId`]; removal is always by id, never
//! by comparing closures.
//!
//! Dispatch snapshots the listeners bound to the event type before calling
//! any of them, and releases the table lock while each listener runs. A
//! listener may therefore bind, unbind or trigger from inside a dispatch:
//! - listeners added during a dispatch do not see the in-flight event
//! - listeners removed during a dispatch are skipped if they have not run yet

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

use crate::event::{Event, IntoEventTypes};

/// Callback invoked for each matching event
pub type Listener = Arc<dyn Fn(&Event) + Send + Sync>;

static NEXT_LISTENER_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identity of one `on`/`one` registration
///
/// Ids are unique across all emitters in the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    fn next() -> Self {
        ListenerId(NEXT_LISTENER_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value, for logging
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

struct Entry {
    id: ListenerId,
    once: bool,
    callback: Listener,
}

#[derive(Default)]
struct ListenerTable {
    by_type: HashMap<String, Vec<Entry>>,
}

impl ListenerTable {
    fn insert(&mut self, types: Vec<String>, id: ListenerId, once: bool, callback: &Listener) {
        for event_type in types {
            self.by_type.entry(event_type).or_default().push(Entry {
                id,
                once,
                callback: Arc::clone(callback),
            });
        }
    }

    fn remove(&mut self, event_type: &str, id: ListenerId) -> bool {
        let Some(entries) = self.by_type.get_mut(event_type) else {
            return false;
        };
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        let removed = entries.len() != before;
        if entries.is_empty() {
            self.by_type.remove(event_type);
        }
        removed
    }
}

/// Shared event emitter
///
/// # Example
///
/// ```rust
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
/// use media_emitter::Emitter;
///
/// let emitter = Emitter::new();
/// let hits = Arc::new(AtomicUsize::new(0));
///
/// let counter = Arc::clone(&hits);
/// let id = emitter.on(["play", "pause"], move |_| {
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
///
/// emitter.trigger("play");
/// emitter.trigger("pause");
/// emitter.off("pause", id);
/// emitter.trigger("pause");
///
/// assert_eq!(hits.load(Ordering::SeqCst), 2);
/// ```
#[derive(Clone, Default)]
pub struct Emitter {
    table: Arc<Mutex<ListenerTable>>,
}

impl Emitter {
    /// Create an emitter with no listeners
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether two handles share one listener table
    pub fn same(a: &Emitter, b: &Emitter) -> bool {
        Arc::ptr_eq(&a.table, &b.table)
    }

    /// Bind a listener to one or more event types
    pub fn on<F>(&self, types: impl IntoEventTypes, listener: F) -> ListenerId
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.on_shared(types, Arc::new(listener))
    }

    /// Bind an already shared listener
    pub fn on_shared(&self, types: impl IntoEventTypes, listener: Listener) -> ListenerId {
        let id = ListenerId::next();
        self.table
            .lock()
            .insert(types.into_event_types(), id, false, &listener);
        id
    }

    /// Bind a listener that is removed, per type, before its first call
    pub fn one<F>(&self, types: impl IntoEventTypes, listener: F) -> ListenerId
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        let id = ListenerId::next();
        let listener: Listener = Arc::new(listener);
        self.table
            .lock()
            .insert(types.into_event_types(), id, true, &listener);
        id
    }

    /// Unbind a listener from the given types
    ///
    /// Returns whether anything was removed. Unknown ids are a no-op.
    pub fn off(&self, types: impl IntoEventTypes, id: ListenerId) -> bool {
        let mut table = self.table.lock();
        let mut removed = false;
        for event_type in types.into_event_types() {
            removed |= table.remove(&event_type, id);
        }
        removed
    }

    /// Unbind a listener from every type it is bound to
    pub fn off_all(&self, id: ListenerId) -> bool {
        let mut table = self.table.lock();
        let types: Vec<String> = table.by_type.keys().cloned().collect();
        let mut removed = false;
        for event_type in types {
            removed |= table.remove(&event_type, id);
        }
        removed
    }

    /// Dispatch an event to every listener bound to its type
    pub fn trigger(&self, event: impl Into<Event>) {
        let event = event.into();

        let snapshot: Vec<ListenerId> = {
            let table = self.table.lock();
            match table.by_type.get(&event.event_type) {
                Some(entries) => entries.iter().map(|entry| entry.id).collect(),
                None => return,
            }
        };

        trace!(
            event_type = %event.event_type,
            listeners = snapshot.len(),
            "dispatching event"
        );

        for id in snapshot {
            let callback = {
                let mut table = self.table.lock();
                let Some(entries) = table.by_type.get_mut(&event.event_type) else {
                    break;
                };
                let Some(pos) = entries.iter().position(|entry| entry.id == id) else {
                    continue;
                };
                if entries[pos].once {
                    let entry = entries.remove(pos);
                    if entries.is_empty() {
                        table.by_type.remove(&event.event_type);
                    }
                    entry.callback
                } else {
                    Arc::clone(&entries[pos].callback)
                }
            };

            callback(&event);
        }
    }

    /// Whether a listener is still bound to the given type
    pub fn is_bound(&self, event_type: &str, id: ListenerId) -> bool {
        self.table
            .lock()
            .by_type
            .get(event_type)
            .map(|entries| entries.iter().any(|entry| entry.id == id))
            .unwrap_or(false)
    }

    /// Number of listeners bound to a type
    pub fn listener_count(&self, event_type: &str) -> usize {
        self.table
            .lock()
            .by_type
            .get(event_type)
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// Total number of bindings across all types
    pub fn total_listeners(&self) -> usize {
        self.table.lock().by_type.values().map(Vec::len).sum()
    }

    /// Drop every listener
    pub fn clear(&self) {
        self.table.lock().by_type.clear();
    }
}

impl std::fmt::Debug for Emitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emitter")
            .field("total_listeners", &self.total_listeners())
            .finish()
    }
}
