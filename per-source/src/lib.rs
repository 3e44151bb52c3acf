//! Per-Source Behaviors
//!
//! Source-change tracking for a media player. Lifecycle events are
//! debounced into bursts, compared against the last known source, and
//! reported as `sourceunstable` / `sourcechanged` on the player. Listeners
//! can be bound "per source" so they go away on their own when the source
//! changes.
//!
//! # Features
//!
//! - **Debounced Detection**: one evaluation per burst of lifecycle events
//! - **Interim Events**: every native event seen during a burst rides along with `sourcechanged`
//! - **Ad Awareness**: detection pauses while the host is presenting an ad
//! - **Per-Source Listeners**: `on_per_src` / `one_per_src` auto-unbind on source change
//! - **Switchable**: `disable` / `enable` suspend everything without tearing down
//!
//! # Architecture
//!
//! ```text
//! Player events ─▶ EventClassifier ─▶ AdGate ─▶ DetectorState ─▶ Burst (timer + catch-all)
//!                                                     │
//!                                   timer fires ◀─────┘
//!                                        │
//!                      flush PerSourceRegistry ─▶ trigger "sourcechanged"
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//! use media_emitter::{ManualClock, Player};
//! use per_source::{PerSourceBehaviors, SourceChanged, SOURCE_CHANGED};
//!
//! let clock = ManualClock::new();
//! let player = Player::with_scheduler(clock.clone());
//! let behaviors = PerSourceBehaviors::install(&player).unwrap();
//!
//! player.on(SOURCE_CHANGED, |event| {
//!     if let Some(change) = event.data::<SourceChanged>() {
//!         println!("now playing {}", change.to);
//!     }
//! });
//!
//! // Only fires while the first source is loaded
//! let progress = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&progress);
//! behaviors.on_per_src("timeupdate", move |_| {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! player.set_src("intro.mp4");
//! player.trigger("timeupdate");
//!
//! player.set_src("feature.mp4");
//! player.trigger("loadstart");
//! clock.tick(1);
//! player.trigger("timeupdate");
//!
//! assert_eq!(progress.load(Ordering::SeqCst), 1);
//! ```
//!
//! # Logging
//!
//! Decisions are logged with `tracing`; see [`logging`] for a ready-made
//! subscriber.

// Core modules
pub mod ads;
pub mod burst;
pub mod classifier;
pub mod config;
pub mod detector;
pub mod registry;
pub mod session;

// Player integration
pub mod ext;

// Error types
pub mod error;

// Logging infrastructure
pub mod logging;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Re-exports
// ============================================================================

pub use session::{BindingHandle, PerSourceBehaviors, SourceChanged, SOURCE_CHANGED, SOURCE_UNSTABLE};

pub use ads::{
    AdGate, AdSubsystem, LegacyAdState, LegacyAds, ModernAdState, ModernAds, AD_LOADING_CLASS,
    AD_PLAYING_CLASS,
};
pub use burst::{InterimEvent, InterimLog};
pub use classifier::{
    EventClass, EventClassifier, EXTENDED_CHANGE_DETECT_EVENTS, MINIMAL_CHANGE_DETECT_EVENTS,
    UNSTABLE_EVENTS,
};
pub use config::{AdStatePolicy, BehaviorConfig, STANDARD_AD_STATES};
pub use ext::PerSourceExt;
pub use registry::BindingId;

pub use error::{BehaviorError, ConfigError, Result};

pub use logging::{init_logging, init_logging_from_env, init_silent, LoggingError, LoggingMode};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::ads::{AdSubsystem, LegacyAdState, ModernAdState};
    pub use crate::config::{AdStatePolicy, BehaviorConfig};
    pub use crate::ext::PerSourceExt;
    pub use crate::session::{
        BindingHandle, PerSourceBehaviors, SourceChanged, SOURCE_CHANGED, SOURCE_UNSTABLE,
    };
}
