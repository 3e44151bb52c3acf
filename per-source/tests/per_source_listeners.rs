//! Per-source listener lifecycle

mod helpers;

use std::sync::Arc;

use helpers::{Counter, Harness};
use media_emitter::Emitter;
use parking_lot::Mutex;
use per_source::{PerSourceExt, SOURCE_CHANGED};

#[test]
fn test_on_per_src_binding() {
    let h = Harness::new();
    let spy = Counter::new();

    h.player.set_src("x-1.mp4");
    h.behaviors.on_per_src("foo", spy.listener());
    h.player.trigger("foo");
    h.player.trigger("foo");
    assert_eq!(spy.get(), 2, "called each time while the source is unchanged");

    h.player.set_src("x-2.mp4");
    h.player.trigger("foo");
    assert_eq!(spy.get(), 2, "not called for a new source");

    h.player.set_src("x-1.mp4");
    h.player.trigger("foo");
    assert_eq!(spy.get(), 2, "restoring the old source does not bring it back");

    h.player.clear_src();
    h.behaviors.on_per_src("foo", spy.listener());
    h.player.trigger("foo");
    assert_eq!(spy.get(), 3, "binding without a source still works");

    h.player.set_src("x-3.mp4");
    h.player.trigger("foo");
    assert_eq!(spy.get(), 3, "gaining a source clears it");

    assert_eq!(h.behaviors.per_source_binding_count(), 0);
    assert_eq!(h.player.emitter().listener_count("foo"), 0);
}

#[test]
fn test_one_per_src_binding() {
    let h = Harness::new();
    let spy = Counter::new();

    h.player.set_src("x-1.mp4");
    h.behaviors.one_per_src("foo", spy.listener());
    for _ in 0..4 {
        h.player.trigger("foo");
    }
    assert_eq!(spy.get(), 1, "called only once with the source unchanged");

    h.player.set_src("x-2.mp4");
    h.player.trigger("foo");
    h.player.set_src("x-1.mp4");
    h.player.trigger("foo");
    assert_eq!(spy.get(), 1);

    h.player.clear_src();
    h.behaviors.one_per_src("foo", spy.listener());
    h.player.trigger("foo");
    assert_eq!(spy.get(), 2);

    h.player.set_src("x-3.mp4");
    h.player.trigger("foo");
    assert_eq!(spy.get(), 2);
}

#[test]
fn test_one_per_src_with_several_types() {
    let h = Harness::new();
    let spy = Counter::new();

    h.player.set_src("x-1.mp4");
    let handle = h.behaviors.one_per_src(["foo", "bar"], spy.listener()).unwrap();

    h.player.trigger("bar");
    h.player.trigger("foo");

    assert_eq!(spy.get(), 1);
    assert!(!handle.is_bound());
    assert_eq!(h.player.emitter().listener_count("foo"), 0);
    assert_eq!(h.player.emitter().listener_count("bar"), 0);
}

#[test]
fn test_flushed_before_sourcechanged_listeners_run() {
    let h = Harness::new();
    let spy = Counter::new();

    h.player.set_src("x-1.mp4");
    h.behaviors.on_per_src("foo", spy.listener());

    // What a sourcechanged listener sees when it runs
    let seen = Arc::new(Mutex::new(None));
    let probe = Arc::clone(&seen);
    let behaviors = h.behaviors.clone();
    let player = h.player.clone();
    h.player.on(SOURCE_CHANGED, move |_| {
        *probe.lock() = Some((
            behaviors.per_source_binding_count(),
            player.emitter().listener_count("foo"),
        ));
    });

    h.player.set_src("x-2.mp4");
    h.player.trigger("loadstart");
    h.settle();

    assert_eq!(*seen.lock(), Some((0, 0)));
}

#[test]
fn test_flush_catches_listeners_matching_new_source_by_coincidence() {
    let h = Harness::new();
    let spy = Counter::new();

    // Bound while the player already reports the upcoming source
    h.player.set_src("x-1.mp4");
    h.behaviors.on_per_src("foo", spy.listener());
    h.player.trigger("loadstart");
    h.settle();
    assert_eq!(h.change_count(), 1);

    h.player.trigger("foo");
    assert_eq!(spy.get(), 0, "stale listener never fires after sourcechanged");
}

#[test]
fn test_bindings_made_in_sourcechanged_survive() {
    let h = Harness::new();
    let spy = Counter::new();

    let behaviors = h.behaviors.clone();
    let listener = spy.clone();
    h.player.on(SOURCE_CHANGED, move |_| {
        behaviors.on_per_src("timeupdate", listener.listener());
    });

    h.player.set_src("x-1.mp4");
    h.player.trigger("loadstart");
    h.settle();

    h.player.trigger("timeupdate");
    assert_eq!(spy.get(), 1);
    assert_eq!(h.behaviors.per_source_binding_count(), 1);
}

#[test]
fn test_target_emitter_binding() {
    let h = Harness::new();
    let tech = Emitter::new();
    let spy = Counter::new();

    h.player.set_src("x-1.mp4");
    h.behaviors.on_per_src_target(&tech, "segment", spy.listener());

    tech.trigger("segment");
    h.player.trigger("segment");
    assert_eq!(spy.get(), 1, "only the target emitter delivers");

    h.player.set_src("x-2.mp4");
    h.player.trigger("loadstart");
    h.settle();

    assert_eq!(tech.listener_count("segment"), 0);
    tech.trigger("segment");
    assert_eq!(spy.get(), 1);
}

#[test]
fn test_one_per_src_target_receives_event() {
    let h = Harness::new();
    let tech = Emitter::new();
    let received = Arc::new(Mutex::new(Vec::new()));

    h.player.set_src("x-1.mp4");
    let sink = Arc::clone(&received);
    h.behaviors.one_per_src_target(&tech, ["a", "b"], move |event| {
        sink.lock().push(event.event_type.clone());
    });

    tech.trigger("b");
    tech.trigger("a");

    assert_eq!(*received.lock(), vec!["b".to_string()]);
    assert_eq!(tech.total_listeners(), 0);
}

#[test]
fn test_target_listener_unbinds_on_source_change_without_burst() {
    let h = Harness::new();
    let tech = Emitter::new();
    let spy = Counter::new();

    h.player.set_src("x-1.mp4");
    h.behaviors.on_per_src_target(&tech, "segment", spy.listener());

    h.player.set_src("x-2.mp4");
    tech.trigger("segment");

    assert_eq!(spy.get(), 0);
    assert_eq!(tech.listener_count("segment"), 0);
    assert_eq!(h.behaviors.per_source_binding_count(), 0);
}

#[test]
fn test_disabled_guard_at_invocation() {
    let h = Harness::new();
    let spy = Counter::new();

    h.player.set_src("x-1.mp4");
    let handle = h.behaviors.on_per_src("foo", spy.listener()).unwrap();

    h.behaviors.disable();
    h.player.trigger("foo");
    assert_eq!(spy.get(), 0);
    assert!(handle.is_bound(), "disabled invocations leave the binding alone");

    h.behaviors.enable();
    h.player.trigger("foo");
    assert_eq!(spy.get(), 1);
}

#[test]
fn test_one_per_src_not_consumed_while_disabled() {
    let h = Harness::new();
    let spy = Counter::new();

    h.player.set_src("x-1.mp4");
    h.behaviors.one_per_src("foo", spy.listener());

    h.behaviors.disable();
    h.player.trigger("foo");
    h.behaviors.enable();
    h.player.trigger("foo");
    h.player.trigger("foo");

    assert_eq!(spy.get(), 1);
}

#[test]
fn test_binds_while_disabled_are_dropped() {
    let h = Harness::new();
    let spy = Counter::new();

    h.behaviors.disable();
    assert!(h.behaviors.on_per_src("foo", spy.listener()).is_none());
    assert!(h.behaviors.one_per_src("foo", spy.listener()).is_none());
    h.behaviors.enable();

    h.player.trigger("foo");
    assert_eq!(spy.get(), 0);
}

#[test]
fn test_listener_may_unbind_itself() {
    let h = Harness::new();
    let spy = Counter::new();
    let slot: Arc<Mutex<Option<per_source::BindingHandle>>> = Arc::new(Mutex::new(None));

    h.player.set_src("x-1.mp4");
    let own = Arc::clone(&slot);
    let count = spy.listener();
    let handle = h
        .behaviors
        .on_per_src("foo", move |event| {
            count(event);
            if let Some(handle) = own.lock().as_ref() {
                handle.unbind();
            }
        })
        .unwrap();
    *slot.lock() = Some(handle.clone());

    h.player.trigger("foo");
    h.player.trigger("foo");

    assert_eq!(spy.get(), 1);
    assert!(!handle.is_bound());
    assert!(!handle.unbind());
}

#[test]
fn test_player_extension_methods() {
    let h = Harness::new();
    let spy = Counter::new();

    h.player.set_src("x-1.mp4");
    h.player.on_per_src("foo", spy.listener());
    h.player.trigger("foo");

    h.player.set_src("x-2.mp4");
    h.player.trigger("foo");

    assert_eq!(spy.get(), 1);
}

#[test]
fn test_dispose_clears_bindings() {
    let h = Harness::new();
    let tech = Emitter::new();
    let spy = Counter::new();

    h.player.set_src("x-1.mp4");
    let on_player = h.behaviors.on_per_src("foo", spy.listener()).unwrap();
    let on_tech = h.behaviors.on_per_src_target(&tech, "bar", spy.listener()).unwrap();
    assert_eq!(h.behaviors.per_source_binding_count(), 2);

    h.player.dispose();

    assert_eq!(h.behaviors.per_source_binding_count(), 0);
    assert!(!on_player.is_bound());
    assert!(!on_tech.is_bound());

    // Left on the foreign emitter, but inert
    tech.trigger("bar");
    assert_eq!(spy.get(), 0);
}
