//! Per-player session
//!
//! [`PerSourceBehaviors`] is the one context object owned by a player
//! attachment. It listens for change-detect events, runs the debounce
//! bursts, announces `sourceunstable`/`sourcechanged` on the player, and
//! owns the per-source listener registry.
//!
//! Listeners and timers installed on the player only hold a weak reference
//! to the session; the player's extension slot holds the strong one until
//! the player is disposed or dropped. The session in turn only holds a weak
//! handle to the player.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use media_emitter::{Emitter, Event, IntoEventTypes, Player, WeakPlayer, DISPOSE_EVENT};
use parking_lot::{Mutex, RwLock};
use tracing::{debug, trace, warn};

use crate::ads::{AdGate, AdSubsystem};
use crate::burst::{Burst, BurstId, InterimEvent, InterimLog};
use crate::classifier::EventClassifier;
use crate::config::BehaviorConfig;
use crate::detector::{Admission, DetectorState, Rejection, Resolution};
use crate::error::{BehaviorError, Result};
use crate::registry::{BindingDescriptor, BindingId, PerSourceRegistry};

/// Triggered on the player when the source may be about to change
pub const SOURCE_UNSTABLE: &str = "sourceunstable";

/// Triggered on the player when a new source has been observed
pub const SOURCE_CHANGED: &str = "sourcechanged";

/// Payload of the `sourcechanged` event
///
/// ```rust
/// use media_emitter::Player;
/// use per_source::{PerSourceBehaviors, SourceChanged, SOURCE_CHANGED};
///
/// let player = Player::new();
/// PerSourceBehaviors::install(&player).unwrap();
///
/// player.on(SOURCE_CHANGED, |event| {
///     let change = event.data::<SourceChanged>().unwrap();
///     println!("{:?} -> {}", change.from, change.to);
/// });
/// ```
#[derive(Debug, Clone)]
pub struct SourceChanged {
    /// Every native event seen during the burst, in delivery order
    pub interim_events: Vec<InterimEvent>,

    /// Previously reported source, `None` for the first one
    pub from: Option<String>,

    /// Newly observed source
    pub to: String,
}

impl SourceChanged {
    /// Types of the interim events, in order
    pub fn event_types(&self) -> Vec<&str> {
        self.interim_events
            .iter()
            .map(InterimEvent::event_type)
            .collect()
    }
}

pub(crate) struct SessionInner {
    player: WeakPlayer,
    config: BehaviorConfig,
    classifier: EventClassifier,
    state: Mutex<DetectorState>,
    registry: Mutex<PerSourceRegistry>,
    ads: RwLock<AdGate>,
    disposed: AtomicBool,
}

/// Per-source behaviors attached to one player
///
/// Cheap to clone; clones are the same session.
///
/// # Example
///
/// ```rust
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
/// use media_emitter::{ManualClock, Player};
/// use per_source::{PerSourceBehaviors, SOURCE_CHANGED};
///
/// let clock = ManualClock::new();
/// let player = Player::with_scheduler(clock.clone());
/// let behaviors = PerSourceBehaviors::install(&player).unwrap();
///
/// let changes = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&changes);
/// player.on(SOURCE_CHANGED, move |_| {
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
///
/// player.set_src("movie.mp4");
/// player.trigger("loadstart");
/// clock.tick(1);
///
/// assert_eq!(changes.load(Ordering::SeqCst), 1);
/// assert_eq!(behaviors.cached_src().as_deref(), Some("movie.mp4"));
/// ```
#[derive(Clone)]
pub struct PerSourceBehaviors {
    inner: Arc<SessionInner>,
}

impl PerSourceBehaviors {
    /// Attach per-source behaviors to a player with the default config
    ///
    /// Attaching twice returns the session created by the first call.
    pub fn install(player: &Player) -> Result<Self> {
        Self::install_with(player, BehaviorConfig::default())
    }

    /// Attach per-source behaviors with a specific configuration
    ///
    /// If the player already has a session, that session is returned and
    /// `config` is ignored.
    pub fn install_with(player: &Player, config: BehaviorConfig) -> Result<Self> {
        if player.is_disposed() {
            return Err(BehaviorError::PlayerDisposed);
        }

        config.validate()?;
        let classifier = EventClassifier::from_config(&config)?;

        let mut fresh = false;
        let session = player.extension_or_insert_with(|| {
            fresh = true;
            Self::new(player.downgrade(), config.clone(), classifier)
        });

        if fresh {
            session.wire(player);
            debug!(
                change_detect = ?session.inner.config.change_detect_events,
                delay_ms = session.inner.config.debounce_delay_ms,
                "per-source behaviors installed"
            );
        } else if session.inner.config != config {
            warn!("per-source behaviors already installed with a different config; keeping the existing one");
        }

        Ok(session)
    }

    fn new(player: WeakPlayer, config: BehaviorConfig, classifier: EventClassifier) -> Self {
        let ads = AdGate::new(AdSubsystem::None, config.ad_policy.clone());
        Self {
            inner: Arc::new(SessionInner {
                player,
                config,
                classifier,
                state: Mutex::new(DetectorState::new()),
                registry: Mutex::new(PerSourceRegistry::new()),
                ads: RwLock::new(ads),
                disposed: AtomicBool::new(false),
            }),
        }
    }

    fn upgrade(weak: &Weak<SessionInner>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    /// Bind the session's own listeners on the player
    fn wire(&self, player: &Player) {
        let weak = Arc::downgrade(&self.inner);
        player.on(self.inner.config.change_detect_events.as_slice(), move |event| {
            if let Some(session) = Self::upgrade(&weak) {
                session.handle_change_detect(event);
            }
        });

        let weak = Arc::downgrade(&self.inner);
        player.on(DISPOSE_EVENT, move |_| {
            if let Some(session) = Self::upgrade(&weak) {
                session.handle_dispose();
            }
        });
    }

    /// The player this session is attached to, while it is still alive
    pub fn player(&self) -> Option<Player> {
        self.inner.player.upgrade()
    }

    pub fn config(&self) -> &BehaviorConfig {
        &self.inner.config
    }

    // ------------------------------------------------------------------
    // Ad subsystem
    // ------------------------------------------------------------------

    /// Attach the host's ad subsystem
    ///
    /// The generation is fixed by the variant given here; it is not
    /// re-detected per event.
    pub fn attach_ads(&self, subsystem: AdSubsystem) {
        debug!(generation = subsystem.generation(), "ad subsystem attached");
        *self.inner.ads.write() = AdGate::new(subsystem, self.inner.config.ad_policy.clone());
    }

    fn ad_gated(&self, player: &Player, event_type: &str) -> bool {
        // Clone out so the ad subsystem is never queried under our lock
        let gate = self.inner.ads.read().clone();
        gate.should_ignore(player, event_type)
    }

    // ------------------------------------------------------------------
    // Source-change detection
    // ------------------------------------------------------------------

    fn handle_change_detect(&self, event: &Event) {
        let Some(player) = self.player() else {
            return;
        };
        let class = self.inner.classifier.classify(&event.event_type);

        let admission = if self.inner.config.require_source_to_start_burst
            && player.current_src().is_none()
        {
            Admission::Rejected(Rejection::NoSource)
        } else {
            let ad_gated = self.ad_gated(&player, &event.event_type);
            self.inner.state.lock().admit(class, ad_gated)
        };

        let destabilized = match admission {
            Admission::Rejected(reason) => {
                trace!(event_type = %event.event_type, ?reason, "event not admitted");
                return;
            }
            Admission::Accepted { destabilized } => destabilized,
        };

        if destabilized {
            let time = player.now();
            debug!(event_type = %event.event_type, "source unstable");
            player.trigger(SOURCE_UNSTABLE);

            // A `sourceunstable` listener may have disabled us or triggered
            // an event that opened a burst; either way this event no longer
            // opens one. It still precedes whatever that burst recorded.
            let state = self.inner.state.lock();
            if state.is_disabled() {
                trace!(event_type = %event.event_type, "disabled during sourceunstable dispatch");
                return;
            }
            if let Some(burst) = state.burst() {
                trace!(
                    burst = burst.id.as_u64(),
                    event_type = %event.event_type,
                    "burst opened during sourceunstable dispatch"
                );
                burst.log.prepend(time, event.clone());
                return;
            }
        }

        self.open_burst(&player, event);
    }

    fn open_burst(&self, player: &Player, event: &Event) {
        let inner = &self.inner;
        let id = BurstId::next();

        let log = InterimLog::new();
        log.record(player.now(), event.clone());

        let host = player.downgrade();
        let writer = log.clone();
        let catch_all = player.on(inner.config.native_events.as_slice(), move |native| {
            if let Some(player) = host.upgrade() {
                writer.record(player.now(), native.clone());
            }
        });

        let weak = Arc::downgrade(inner);
        let timer = player.set_timeout(inner.config.debounce_delay_ms, move || {
            if let Some(session) = Self::upgrade(&weak) {
                session.evaluate_burst(id);
            }
        });

        debug!(
            burst = id.as_u64(),
            event_type = %event.event_type,
            "burst started"
        );

        inner.state.lock().begin_burst(Burst {
            id,
            timer,
            catch_all,
            log,
        });
    }

    fn evaluate_burst(&self, id: BurstId) {
        let Some(player) = self.player() else {
            return;
        };
        let current_src = player.current_src();

        let (burst, resolution) = {
            let mut state = self.inner.state.lock();
            let Some(burst) = state.close_burst(id) else {
                trace!(burst = id.as_u64(), "stale burst timer ignored");
                return;
            };
            let resolution = state.resolve(current_src.as_deref());
            (burst, resolution)
        };

        self.release_catch_all(&player, &burst);
        let interim_events = burst.log.take();

        match resolution {
            Resolution::Unchanged => {
                debug!(
                    burst = id.as_u64(),
                    src = ?current_src,
                    interim_events = interim_events.len(),
                    "burst resolved, source unchanged"
                );
            }
            Resolution::Changed { from, to } => {
                // Stale per-source listeners must be gone before anyone
                // hears about the new source.
                self.flush_bindings(&player);

                debug!(
                    burst = id.as_u64(),
                    from = ?from,
                    to = %to,
                    interim_events = interim_events.len(),
                    "source changed"
                );

                player.trigger_with(
                    SOURCE_CHANGED,
                    SourceChanged {
                        interim_events,
                        from,
                        to: to.clone(),
                    },
                );

                self.inner.state.lock().commit(to);
            }
        }
    }

    fn release_catch_all(&self, player: &Player, burst: &Burst) {
        player.off(self.inner.config.native_events.as_slice(), burst.catch_all);
    }

    fn cancel_burst(&self, burst: Burst) {
        if let Some(player) = self.player() {
            player.clear_timeout(burst.timer);
            self.release_catch_all(&player, &burst);
        }
        debug!(
            burst = burst.id.as_u64(),
            discarded_events = burst.log.len(),
            "pending burst cancelled"
        );
    }

    fn handle_dispose(&self) {
        self.inner.disposed.store(true, Ordering::SeqCst);

        let burst = self.inner.state.lock().abandon_burst();
        if let (Some(burst), Some(player)) = (burst, self.player()) {
            player.clear_timeout(burst.timer);
        }

        // The player drops its own listeners; just forget ours
        let mut registry = self.inner.registry.lock();
        trace!(bindings = registry.len(), "clearing per-source registry on dispose");
        registry.clear();
    }

    // ------------------------------------------------------------------
    // Enable / disable
    // ------------------------------------------------------------------

    /// Suspend all per-source behaviors
    ///
    /// Cancels any pending burst without emitting. Idempotent.
    pub fn disable(&self) {
        let burst = self.inner.state.lock().disable();
        if let Some(burst) = burst {
            self.cancel_burst(burst);
        }
        debug!("per-source behaviors disabled");
    }

    /// Resume per-source behaviors
    ///
    /// Events missed while disabled are not replayed. Idempotent.
    pub fn enable(&self) {
        self.inner.state.lock().enable();
        debug!("per-source behaviors enabled");
    }

    pub fn disabled(&self) -> bool {
        self.inner.state.lock().is_disabled()
    }

    pub fn enabled(&self) -> bool {
        !self.disabled()
    }

    /// Whether the source is believed stable
    ///
    /// `false` between an unstable event and the end of its burst.
    pub fn is_src_stable(&self) -> bool {
        self.inner.state.lock().is_src_stable()
    }

    /// The source last announced through `sourcechanged`
    pub fn cached_src(&self) -> Option<String> {
        self.inner.state.lock().cached_src().map(str::to_string)
    }

    /// Whether a debounce burst is open
    pub fn is_burst_pending(&self) -> bool {
        self.inner.state.lock().has_burst()
    }

    fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::SeqCst)
    }

    // ------------------------------------------------------------------
    // Per-source listeners
    // ------------------------------------------------------------------

    /// Bind a player listener that lives only as long as the current source
    ///
    /// The listener is unbound the first time it would be called after the
    /// source changed, and in any case right before `sourcechanged` fires.
    /// Returns `None` when disabled or once the player is gone.
    pub fn on_per_src<F>(&self, types: impl IntoEventTypes, listener: F) -> Option<BindingHandle>
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.bind(None, types, false, listener)
    }

    /// Like [`on_per_src`](Self::on_per_src), but called at most once
    pub fn one_per_src<F>(&self, types: impl IntoEventTypes, listener: F) -> Option<BindingHandle>
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.bind(None, types, true, listener)
    }

    /// Per-source listener on another emitter
    pub fn on_per_src_target<F>(
        &self,
        target: &Emitter,
        types: impl IntoEventTypes,
        listener: F,
    ) -> Option<BindingHandle>
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.bind(Some(target), types, false, listener)
    }

    /// One-shot per-source listener on another emitter
    pub fn one_per_src_target<F>(
        &self,
        target: &Emitter,
        types: impl IntoEventTypes,
        listener: F,
    ) -> Option<BindingHandle>
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.bind(Some(target), types, true, listener)
    }

    /// Number of per-source bindings still active
    pub fn per_source_binding_count(&self) -> usize {
        self.inner.registry.lock().len()
    }

    fn bind<F>(
        &self,
        target: Option<&Emitter>,
        types: impl IntoEventTypes,
        once: bool,
        listener: F,
    ) -> Option<BindingHandle>
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        let player = match self.player() {
            Some(player) if !self.disabled() && !self.is_disposed() => player,
            _ => {
                trace!("per-source bind refused");
                return None;
            }
        };

        let player_emitter = player.emitter();
        let target = target.filter(|t| !Emitter::same(t, player_emitter)).cloned();
        let types = types.into_event_types();
        let original_src = player.current_src();
        let id = BindingId::next();

        let weak = Arc::downgrade(&self.inner);
        let bound_src = original_src.clone();
        let wrapped = move |event: &Event| {
            let Some(session) = Self::upgrade(&weak) else {
                return;
            };
            let Some(player) = session.player() else {
                return;
            };
            if session.disabled() || session.is_disposed() {
                return;
            }

            let changed = player.current_src() != bound_src;
            if changed || once {
                trace!(binding = id.as_u64(), changed, once, "per-source listener unbinding");
                session.unbind(id);
            }
            if !changed {
                listener(event);
            }
        };

        let emitter = target.as_ref().unwrap_or(player_emitter);
        let listener_id = emitter.on(types.clone(), wrapped);

        trace!(
            binding = id.as_u64(),
            types = ?types,
            once,
            src = ?original_src,
            "per-source listener bound"
        );

        self.inner.registry.lock().push(BindingDescriptor {
            id,
            target,
            types,
            listener: listener_id,
        });

        Some(BindingHandle {
            id,
            session: Arc::downgrade(&self.inner),
        })
    }

    /// Remove one per-source binding; no-op if it is already gone
    fn unbind(&self, id: BindingId) -> bool {
        let descriptor = self.inner.registry.lock().remove(id);
        match descriptor {
            Some(descriptor) => {
                let player = self.player();
                descriptor.unbind_from(player.as_ref().map(Player::emitter));
                true
            }
            None => false,
        }
    }

    fn flush_bindings(&self, player: &Player) {
        let drained = self.inner.registry.lock().drain();
        if drained.is_empty() {
            return;
        }

        for descriptor in &drained {
            descriptor.unbind_from(Some(player.emitter()));
        }
        trace!(count = drained.len(), "per-source listeners flushed");
    }
}

impl std::fmt::Debug for PerSourceBehaviors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("PerSourceBehaviors")
            .field("cached_src", &state.cached_src())
            .field("src_stable", &state.is_src_stable())
            .field("disabled", &state.is_disabled())
            .field("burst_pending", &state.has_burst())
            .field("bindings", &self.inner.registry.lock().len())
            .finish()
    }
}

/// Handle to one per-source binding
///
/// The only way to remove a per-source listener early. Dropping the handle
/// does not unbind.
#[derive(Debug, Clone)]
pub struct BindingHandle {
    id: BindingId,
    session: Weak<SessionInner>,
}

impl BindingHandle {
    pub fn id(&self) -> BindingId {
        self.id
    }

    /// Unbind now; returns whether the binding was still active
    pub fn unbind(&self) -> bool {
        PerSourceBehaviors::upgrade(&self.session)
            .map(|session| session.unbind(self.id))
            .unwrap_or(false)
    }

    /// Whether the binding is still active
    pub fn is_bound(&self) -> bool {
        PerSourceBehaviors::upgrade(&self.session)
            .map(|session| session.inner.registry.lock().contains(self.id))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use media_emitter::ManualClock;
    use std::sync::atomic::AtomicUsize;

    fn setup() -> (ManualClock, Player, PerSourceBehaviors) {
        let clock = ManualClock::new();
        let player = Player::with_scheduler(clock.clone());
        let behaviors = PerSourceBehaviors::install(&player).unwrap();
        (clock, player, behaviors)
    }

    fn count(player: &Player, event_type: &str) -> Arc<AtomicUsize> {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        player.on(event_type, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        hits
    }

    #[test]
    fn test_install_is_idempotent() {
        let player = Player::new();
        let first = PerSourceBehaviors::install(&player).unwrap();
        let second = PerSourceBehaviors::install_with(&player, BehaviorConfig::extended()).unwrap();

        assert!(Arc::ptr_eq(&first.inner, &second.inner));
        assert_eq!(second.config(), &BehaviorConfig::default());
        // One change-detect listener, not two
        assert_eq!(player.emitter().listener_count("loadstart"), 1);
    }

    #[test]
    fn test_install_rejects_disposed_player() {
        let player = Player::new();
        player.dispose();

        assert!(matches!(
            PerSourceBehaviors::install(&player),
            Err(BehaviorError::PlayerDisposed)
        ));
    }

    #[test]
    fn test_install_rejects_bad_config() {
        let player = Player::new();
        let config = BehaviorConfig::default().with_debounce_delay_ms(0);

        assert!(matches!(
            PerSourceBehaviors::install_with(&player, config),
            Err(BehaviorError::Config(_))
        ));
        assert!(player.extension::<PerSourceBehaviors>().is_none());
    }

    #[test]
    fn test_burst_lifecycle() {
        let (clock, player, behaviors) = setup();
        let changed = count(&player, SOURCE_CHANGED);

        player.set_src("x-1.mp4");
        player.trigger("loadstart");
        assert!(behaviors.is_burst_pending());
        assert_eq!(player.emitter().listener_count("timeupdate"), 1);

        clock.tick(1);
        assert!(!behaviors.is_burst_pending());
        assert_eq!(player.emitter().listener_count("timeupdate"), 0);
        assert_eq!(changed.load(Ordering::SeqCst), 1);
        assert_eq!(behaviors.cached_src().as_deref(), Some("x-1.mp4"));
    }

    #[test]
    fn test_disable_releases_catch_all() {
        let (clock, player, behaviors) = setup();
        let changed = count(&player, SOURCE_CHANGED);

        player.set_src("x-1.mp4");
        player.trigger("play");
        behaviors.disable();
        behaviors.disable();

        assert!(!behaviors.is_burst_pending());
        assert_eq!(player.emitter().listener_count("timeupdate"), 0);
        assert_eq!(player.pending_timers(), 0);

        clock.tick(10);
        assert_eq!(changed.load(Ordering::SeqCst), 0);
        assert_eq!(behaviors.cached_src(), None);
    }

    #[test]
    fn test_bind_refused_while_disabled() {
        let (_clock, player, behaviors) = setup();

        behaviors.disable();
        assert!(behaviors.on_per_src("foo", |_| {}).is_none());
        assert_eq!(behaviors.per_source_binding_count(), 0);
        assert_eq!(player.emitter().listener_count("foo"), 0);

        behaviors.enable();
        assert!(behaviors.on_per_src("foo", |_| {}).is_some());
        assert_eq!(behaviors.per_source_binding_count(), 1);
    }

    #[test]
    fn test_handle_unbind() {
        let (_clock, player, behaviors) = setup();
        let hits = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&hits);
        let handle = behaviors
            .on_per_src("foo", move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        player.trigger("foo");
        assert!(handle.is_bound());
        assert!(handle.unbind());
        assert!(!handle.unbind());
        assert!(!handle.is_bound());

        player.trigger("foo");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_target_equal_to_player_is_normalized() {
        let (_clock, player, behaviors) = setup();

        behaviors.on_per_src_target(&player.emitter().clone(), "foo", |_| {});
        let registry = behaviors.inner.registry.lock();
        assert!(registry.iter().all(BindingDescriptor::targets_player));
    }

    #[test]
    fn test_undisposed_player_is_freed() {
        struct Sentinel(Arc<AtomicBool>);

        impl Drop for Sentinel {
            fn drop(&mut self) {
                self.0.store(true, Ordering::SeqCst);
            }
        }

        let clock = ManualClock::new();
        let dropped = Arc::new(AtomicBool::new(false));
        {
            let player = Player::with_scheduler(clock.clone());
            player.set_extension(Sentinel(Arc::clone(&dropped)));
            let behaviors = PerSourceBehaviors::install(&player).unwrap();

            behaviors.on_per_src("foo", |_| {});
            player.set_src("x-1.mp4");
            player.trigger("loadstart");
            assert!(behaviors.is_burst_pending());
        }

        assert!(dropped.load(Ordering::SeqCst));

        // The orphaned burst timer finds nothing to evaluate
        clock.tick(10);
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn test_session_outliving_player_is_inert() {
        let player = Player::new();
        let behaviors = PerSourceBehaviors::install(&player).unwrap();
        let handle = behaviors.on_per_src("foo", |_| {}).unwrap();

        drop(player);

        assert!(behaviors.player().is_none());
        assert!(behaviors.on_per_src("foo", |_| {}).is_none());
        assert!(handle.unbind());
        behaviors.disable();
        assert_eq!(behaviors.per_source_binding_count(), 0);
    }

    #[test]
    fn test_install_rejects_duplicate_events() {
        let player = Player::new();
        let config = BehaviorConfig::default()
            .with_change_detect_events(["abort", "emptied", "loadstart", "play", "play"]);

        assert!(matches!(
            PerSourceBehaviors::install_with(&player, config),
            Err(BehaviorError::Config(ConfigError::DuplicateEvent { .. }))
        ));
    }

    #[test]
    fn test_dispose_clears_registry_and_refuses_binds() {
        let (clock, player, behaviors) = setup();
        let other = Emitter::new();

        behaviors.on_per_src("foo", |_| {});
        behaviors.on_per_src_target(&other, "bar", |_| {});
        player.set_src("x-1.mp4");
        player.trigger("loadstart");

        player.dispose();
        assert_eq!(behaviors.per_source_binding_count(), 0);
        assert!(!behaviors.is_burst_pending());
        assert!(behaviors.on_per_src("foo", |_| {}).is_none());

        // Nothing left to fire
        clock.tick(10);
        assert_eq!(behaviors.cached_src(), None);
    }
}
