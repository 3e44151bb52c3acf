//! Media Host Primitives
//!
//! The pieces of a media player that behaviors layered on top of it rely
//! on: an event emitter, lifecycle-scoped timers and the current source.
//!
//! # Features
//!
//! - **Shared Emitter**: `on`/`one`/`off`/`trigger` with id-based removal
//! - **Re-entrant Dispatch**: listeners may bind, unbind and trigger mid-dispatch
//! - **Injected Clock**: timers run on a [`Scheduler`]; [`ManualClock`] gives virtual time
//! - **Typed Payloads**: events carry any `Send + Sync` value, read back by type
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use media_emitter::{ManualClock, Player};
//!
//! let clock = ManualClock::new();
//! let player = Player::with_scheduler(clock.clone());
//! let seen = Arc::new(Mutex::new(Vec::new()));
//!
//! let log = Arc::clone(&seen);
//! player.on(["loadstart", "play"], move |event| {
//!     log.lock().unwrap().push(event.event_type.clone());
//! });
//!
//! player.set_src("movie.mp4");
//! player.trigger("loadstart");
//! player.trigger("play");
//!
//! assert_eq!(*seen.lock().unwrap(), vec!["loadstart", "play"]);
//! ```
//!
//! # Architecture
//!
//! ```text
//! Player
//!     │
//!     ├── emitter: Emitter ── HashMap<type, Vec<(ListenerId, Listener)>>
//!     │
//!     ├── scheduler: Arc<dyn Scheduler> ── ManualClock (virtual time)
//!     │
//!     ├── src / classes
//!     │
//!     └── extensions: Extensions ── HashMap<TypeId, Box<dyn Any>>
//! ```

// Modules
pub mod emitter;
pub mod event;
pub mod extensions;
pub mod player;
pub mod scheduler;

// Re-exports - Public API
pub use emitter::{Emitter, Listener, ListenerId};
pub use event::{Event, IntoEventTypes};
pub use extensions::Extensions;
pub use player::{Player, WeakPlayer, DISPOSE_EVENT, NATIVE_EVENTS};
pub use scheduler::{ManualClock, Scheduler, TimerCallback, TimerId};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::emitter::{Emitter, ListenerId};
    pub use crate::event::Event;
    pub use crate::player::{Player, NATIVE_EVENTS};
    pub use crate::scheduler::{ManualClock, Scheduler};
}
