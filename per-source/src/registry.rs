//! Per-source listener registry
//!
//! Every still-active per-source binding is described here, in bind order,
//! with everything needed to undo its `on` call: the target emitter (or the
//! player), the event types and the listener id.

use std::sync::atomic::{AtomicU64, Ordering};

use media_emitter::{Emitter, ListenerId};

static NEXT_BINDING_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one per-source binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingId(u64);

impl BindingId {
    pub fn next() -> Self {
        BindingId(NEXT_BINDING_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// One per-source `on` call, fully described so it can be undone
#[derive(Debug, Clone)]
pub struct BindingDescriptor {
    pub id: BindingId,

    /// Emitter the listener is bound on; `None` means the player itself
    pub target: Option<Emitter>,

    pub types: Vec<String>,

    /// Id of the wrapped listener on the target
    pub listener: ListenerId,
}

impl BindingDescriptor {
    pub fn targets_player(&self) -> bool {
        self.target.is_none()
    }

    /// Remove the wrapped listener from its emitter
    ///
    /// `player` is the player's own emitter, used when `target` is `None`;
    /// pass `None` once the player is gone.
    pub fn unbind_from(&self, player: Option<&Emitter>) -> bool {
        match self.target.as_ref().or(player) {
            Some(emitter) => emitter.off(self.types.as_slice(), self.listener),
            None => false,
        }
    }
}

/// Ordered collection of active per-source bindings
#[derive(Debug, Default)]
pub struct PerSourceRegistry {
    bindings: Vec<BindingDescriptor>,
}

impl PerSourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, descriptor: BindingDescriptor) {
        self.bindings.push(descriptor);
    }

    /// Remove one binding, returning its descriptor if it was present
    pub fn remove(&mut self, id: BindingId) -> Option<BindingDescriptor> {
        let pos = self.bindings.iter().position(|b| b.id == id)?;
        Some(self.bindings.remove(pos))
    }

    /// Remove every binding, returned in bind order
    pub fn drain(&mut self) -> Vec<BindingDescriptor> {
        std::mem::take(&mut self.bindings)
    }

    /// Forget every binding without unbinding anything
    pub fn clear(&mut self) {
        self.bindings.clear();
    }

    pub fn contains(&self, id: BindingId) -> bool {
        self.bindings.iter().any(|b| b.id == id)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BindingDescriptor> {
        self.bindings.iter()
    }
}
