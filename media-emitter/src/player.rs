//! Host player
//!
//! `Player` bundles what a playback component exposes to behaviors layered
//! on top of it: an event emitter, a lifecycle-scoped timer API backed by an
//! injected [`Scheduler`], the current source, UI state classes and a slot
//! for attached extensions.
//!
//! The player does not decode or play anything. Whoever drives it sets the
//! source and triggers the media lifecycle events.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::debug;

use crate::emitter::{Emitter, ListenerId};
use crate::event::{Event, IntoEventTypes};
use crate::extensions::Extensions;
use crate::scheduler::{ManualClock, Scheduler, TimerCallback, TimerId};

/// Lifecycle events a media element can emit
pub const NATIVE_EVENTS: &[&str] = &[
    "loadstart",
    "suspend",
    "abort",
    "error",
    "emptied",
    "stalled",
    "loadedmetadata",
    "loadeddata",
    "canplay",
    "canplaythrough",
    "playing",
    "waiting",
    "seeking",
    "seeked",
    "ended",
    "durationchange",
    "timeupdate",
    "progress",
    "play",
    "pause",
    "ratechange",
    "resize",
    "volumechange",
];

/// Event triggered when the player is torn down
pub const DISPOSE_EVENT: &str = "dispose";

struct PlayerInner {
    emitter: Emitter,
    scheduler: Arc<dyn Scheduler>,
    src: Mutex<Option<String>>,
    classes: Mutex<HashSet<String>>,
    extensions: Mutex<Extensions>,
    /// Timers scheduled through this player and not yet fired
    timers: Arc<Mutex<HashSet<TimerId>>>,
    disposed: Arc<AtomicBool>,
}

/// Shared handle to a host player
///
/// Clones refer to the same player.
///
/// # Example
///
/// ```rust
/// use media_emitter::{ManualClock, Player};
///
/// let clock = ManualClock::new();
/// let player = Player::with_scheduler(clock.clone());
///
/// assert_eq!(player.current_src(), None);
/// player.set_src("movie.mp4");
/// assert_eq!(player.current_src().as_deref(), Some("movie.mp4"));
///
/// player.trigger("loadstart");
/// clock.tick(1);
/// ```
#[derive(Clone)]
pub struct Player {
    inner: Arc<PlayerInner>,
}

impl Player {
    /// Create a player driven by its own `ManualClock`
    pub fn new() -> Self {
        Self::with_scheduler(ManualClock::new())
    }

    /// Create a player driven by an injected scheduler
    pub fn with_scheduler(scheduler: impl Scheduler + 'static) -> Self {
        Self::with_shared_scheduler(Arc::new(scheduler))
    }

    /// Create a player sharing a scheduler with other components
    pub fn with_shared_scheduler(scheduler: Arc<dyn Scheduler>) -> Self {
        Self {
            inner: Arc::new(PlayerInner {
                emitter: Emitter::new(),
                scheduler,
                src: Mutex::new(None),
                classes: Mutex::new(HashSet::new()),
                extensions: Mutex::new(Extensions::new()),
                timers: Arc::new(Mutex::new(HashSet::new())),
                disposed: Arc::new(AtomicBool::new(false)),
            }),
        }
    }

    /// Whether two handles refer to the same player
    pub fn same(a: &Player, b: &Player) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }

    /// A handle that does not keep the player alive
    ///
    /// Extensions stored on the player should reach back through this, or
    /// the player and the extension keep each other alive.
    pub fn downgrade(&self) -> WeakPlayer {
        WeakPlayer {
            inner: Arc::downgrade(&self.inner),
        }
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    /// The player's own emitter
    pub fn emitter(&self) -> &Emitter {
        &self.inner.emitter
    }

    pub fn on<F>(&self, types: impl IntoEventTypes, listener: F) -> ListenerId
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.inner.emitter.on(types, listener)
    }

    pub fn one<F>(&self, types: impl IntoEventTypes, listener: F) -> ListenerId
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.inner.emitter.one(types, listener)
    }

    pub fn off(&self, types: impl IntoEventTypes, id: ListenerId) -> bool {
        self.inner.emitter.off(types, id)
    }

    pub fn trigger(&self, event: impl Into<Event>) {
        self.inner.emitter.trigger(event)
    }

    /// Trigger an event carrying a payload
    pub fn trigger_with<T: std::any::Any + Send + Sync>(&self, event_type: &str, data: T) {
        self.inner.emitter.trigger(Event::with_data(event_type, data))
    }

    // ------------------------------------------------------------------
    // Timers
    // ------------------------------------------------------------------

    /// Current time according to the injected scheduler
    pub fn now(&self) -> u64 {
        self.inner.scheduler.now()
    }

    /// Schedule a one-shot callback scoped to this player's lifetime
    ///
    /// Pending timers are cancelled when the player is disposed.
    pub fn set_timeout<F>(&self, delay_ms: u64, callback: F) -> TimerId
    where
        F: FnOnce() + Send + 'static,
    {
        let timers = Arc::clone(&self.inner.timers);
        let disposed = Arc::clone(&self.inner.disposed);
        let slot = Arc::new(Mutex::new(TimerSlot::Scheduling));
        let own_slot = Arc::clone(&slot);

        let wrapped: TimerCallback = Box::new(move || {
            let previous = std::mem::replace(&mut *own_slot.lock(), TimerSlot::Fired);
            if let TimerSlot::Tracked(id) = previous {
                timers.lock().remove(&id);
            }
            if !disposed.load(Ordering::SeqCst) {
                callback();
            }
        });

        let id = self.inner.scheduler.set_timeout(delay_ms, wrapped);

        // Lock order is slot, then timers, in both places
        let mut slot = slot.lock();
        if matches!(*slot, TimerSlot::Scheduling) {
            *slot = TimerSlot::Tracked(id);
            self.inner.timers.lock().insert(id);
        }
        id
    }

    /// Cancel a timer scheduled through this player
    pub fn clear_timeout(&self, id: TimerId) -> bool {
        self.inner.timers.lock().remove(&id);
        self.inner.scheduler.clear_timeout(id)
    }

    /// Number of this player's timers still pending
    pub fn pending_timers(&self) -> usize {
        self.inner.timers.lock().len()
    }

    // ------------------------------------------------------------------
    // Source
    // ------------------------------------------------------------------

    /// The source currently loaded, if any
    ///
    /// An empty source string is reported as no source.
    pub fn current_src(&self) -> Option<String> {
        self.inner
            .src
            .lock()
            .as_ref()
            .filter(|src| !src.is_empty())
            .cloned()
    }

    /// Change the source identity reported by `current_src`
    ///
    /// This does not trigger any events on its own.
    pub fn set_src(&self, src: impl Into<String>) {
        *self.inner.src.lock() = Some(src.into());
    }

    /// Forget the current source
    pub fn clear_src(&self) {
        *self.inner.src.lock() = None;
    }

    // ------------------------------------------------------------------
    // UI state classes
    // ------------------------------------------------------------------

    pub fn add_class(&self, name: &str) {
        self.inner.classes.lock().insert(name.to_string());
    }

    pub fn remove_class(&self, name: &str) {
        self.inner.classes.lock().remove(name);
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.inner.classes.lock().contains(name)
    }

    // ------------------------------------------------------------------
    // Extensions
    // ------------------------------------------------------------------

    /// Get the extension of type `T`, if attached
    pub fn extension<T: Clone + Send + Sync + 'static>(&self) -> Option<T> {
        self.inner.extensions.lock().get::<T>()
    }

    /// Attach an extension, returning the one it replaced
    pub fn set_extension<T: Send + Sync + 'static>(&self, value: T) -> Option<T> {
        self.inner.extensions.lock().insert(value)
    }

    /// Get the extension of type `T`, attaching one built by `init` if absent
    ///
    /// The check and the insert happen under one lock, so two callers
    /// racing to attach still end up with the same extension.
    pub fn extension_or_insert_with<T, F>(&self, init: F) -> T
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> T,
    {
        let mut extensions = self.inner.extensions.lock();
        if let Some(existing) = extensions.get::<T>() {
            return existing;
        }
        let value = init();
        extensions.insert(value.clone());
        value
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Tear the player down
    ///
    /// Triggers `dispose`, then drops every listener, every pending timer
    /// and every extension. Calling it again does nothing.
    pub fn dispose(&self) {
        if self.inner.disposed.swap(true, Ordering::SeqCst) {
            return;
        }

        debug!("disposing player");
        self.inner.emitter.trigger(DISPOSE_EVENT);

        let timers: Vec<TimerId> = self.inner.timers.lock().drain().collect();
        for id in timers {
            self.inner.scheduler.clear_timeout(id);
        }

        self.inner.emitter.clear();

        // Move the extensions out before dropping them; their destructors
        // may reach back into the player.
        let extensions = std::mem::take(&mut *self.inner.extensions.lock());
        drop(extensions);
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::SeqCst)
    }
}

/// Tracking state of one player timer
enum TimerSlot {
    /// Handed to the scheduler, id not known yet
    Scheduling,
    Tracked(TimerId),
    /// Already ran; never track it
    Fired,
}

/// Non-owning handle to a [`Player`]
///
/// Obtained from [`Player::downgrade`].
#[derive(Clone, Default)]
pub struct WeakPlayer {
    inner: Weak<PlayerInner>,
}

impl WeakPlayer {
    /// The player, if any strong handle to it still exists
    pub fn upgrade(&self) -> Option<Player> {
        self.inner.upgrade().map(|inner| Player { inner })
    }
}

impl std::fmt::Debug for WeakPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeakPlayer")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("current_src", &self.current_src())
            .field("pending_timers", &self.pending_timers())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
