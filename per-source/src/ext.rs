//! `Player` extension trait
//!
//! Lets code that only holds a `Player` reach the per-source surface, the
//! way the behaviors show up as methods on the player itself.

use media_emitter::{Event, IntoEventTypes, Player};

use crate::session::{BindingHandle, PerSourceBehaviors};

/// Per-source methods on a [`Player`]
///
/// Nothing is installed implicitly: until [`PerSourceBehaviors::install`]
/// has run for the player, the binding methods return `None`.
///
/// ```rust
/// use media_emitter::Player;
/// use per_source::{PerSourceBehaviors, PerSourceExt};
///
/// let player = Player::new();
/// assert!(player.per_source().is_none());
///
/// PerSourceBehaviors::install(&player).unwrap();
/// let handle = player.on_per_src("timeupdate", |_| {});
/// assert!(handle.is_some());
/// ```
pub trait PerSourceExt {
    /// The session installed on this player, if any
    fn per_source(&self) -> Option<PerSourceBehaviors>;

    /// See [`PerSourceBehaviors::on_per_src`]
    fn on_per_src<F>(&self, types: impl IntoEventTypes, listener: F) -> Option<BindingHandle>
    where
        F: Fn(&Event) + Send + Sync + 'static;

    /// See [`PerSourceBehaviors::one_per_src`]
    fn one_per_src<F>(&self, types: impl IntoEventTypes, listener: F) -> Option<BindingHandle>
    where
        F: Fn(&Event) + Send + Sync + 'static;
}

impl PerSourceExt for Player {
    fn per_source(&self) -> Option<PerSourceBehaviors> {
        self.extension::<PerSourceBehaviors>()
    }

    fn on_per_src<F>(&self, types: impl IntoEventTypes, listener: F) -> Option<BindingHandle>
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.per_source()?.on_per_src(types, listener)
    }

    fn one_per_src<F>(&self, types: impl IntoEventTypes, listener: F) -> Option<BindingHandle>
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.per_source()?.one_per_src(types, listener)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_methods_need_installed_session() {
        let player = Player::new();

        assert!(player.per_source().is_none());
        assert!(player.on_per_src("foo", |_| {}).is_none());
        assert!(player.one_per_src("foo", |_| {}).is_none());
        assert_eq!(player.emitter().listener_count("foo"), 0);
    }

    #[test]
    fn test_methods_forward_to_session() {
        let player = Player::new();
        let behaviors = PerSourceBehaviors::install(&player).unwrap();

        let handle = player.one_per_src("foo", |_| {}).unwrap();
        assert_eq!(behaviors.per_source_binding_count(), 1);

        player.trigger("foo");
        assert!(!handle.is_bound());
        assert_eq!(behaviors.per_source_binding_count(), 0);
    }

    #[test]
    fn test_session_gone_after_dispose() {
        let player = Player::new();
        PerSourceBehaviors::install(&player).unwrap();

        player.dispose();
        assert!(player.per_source().is_none());
    }
}
