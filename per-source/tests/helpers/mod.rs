//! Shared setup for per-source integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use media_emitter::{Event, ManualClock, Player};
use parking_lot::Mutex;
use per_source::{BehaviorConfig, PerSourceBehaviors, SourceChanged, SOURCE_CHANGED, SOURCE_UNSTABLE};

/// A player on virtual time with behaviors installed and signals recorded
pub struct Harness {
    pub clock: ManualClock,
    pub player: Player,
    pub behaviors: PerSourceBehaviors,
    pub changes: Arc<Mutex<Vec<SourceChanged>>>,
    pub unstable: Counter,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(BehaviorConfig::default())
    }

    /// Mirrors a freshly readied player: time starts at 1
    pub fn with_config(config: BehaviorConfig) -> Self {
        let clock = ManualClock::new();
        let player = Player::with_scheduler(clock.clone());
        let behaviors = PerSourceBehaviors::install_with(&player, config).unwrap();

        let changes = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&changes);
        player.on(SOURCE_CHANGED, move |event: &Event| {
            let change = event
                .data::<SourceChanged>()
                .expect("sourcechanged carries a payload")
                .clone();
            sink.lock().push(change);
        });

        let unstable = Counter::new();
        player.on(SOURCE_UNSTABLE, unstable.listener());

        clock.tick(1);

        Self {
            clock,
            player,
            behaviors,
            changes,
            unstable,
        }
    }

    pub fn trigger_series(&self, series: &[&str]) {
        for event_type in series {
            self.player.trigger(*event_type);
        }
    }

    /// Tick well past the debounce delay
    pub fn settle(&self) {
        self.clock.tick(10);
    }

    pub fn change_count(&self) -> usize {
        self.changes.lock().len()
    }

    pub fn change(&self, index: usize) -> SourceChanged {
        self.changes.lock()[index].clone()
    }

    pub fn reset_changes(&self) {
        self.changes.lock().clear();
    }
}

/// Simplified view of a `sourcechanged` payload
pub fn summarize(change: &SourceChanged) -> (Option<String>, String, Vec<(u64, String)>) {
    let interim = change
        .interim_events
        .iter()
        .map(|e| (e.time, e.event_type().to_string()))
        .collect();
    (change.from.clone(), change.to.clone(), interim)
}

pub fn timed(time: u64, types: &[&str]) -> Vec<(u64, String)> {
    types.iter().map(|t| (time, t.to_string())).collect()
}

/// Call counter usable as a listener
#[derive(Clone, Default)]
pub struct Counter {
    hits: Arc<AtomicUsize>,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listener(&self) -> impl Fn(&Event) + Send + Sync + 'static {
        let hits = Arc::clone(&self.hits);
        move |_| {
            hits.fetch_add(1, Ordering::SeqCst);
        }
    }

    pub fn get(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}
