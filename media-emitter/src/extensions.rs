//! Type-erased per-player extension storage
//!
//! Behaviors attached to a player keep their session handle here, keyed by
//! type, so that attaching the same behavior twice can find the first one.

use std::any::{Any, TypeId};
use std::collections::HashMap;

/// Type-erased storage keyed by `TypeId`
///
/// # Example
///
/// ```rust
/// use media_emitter::Extensions;
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Marker(u8);
///
/// let mut ext = Extensions::new();
/// assert!(ext.get::<Marker>().is_none());
///
/// assert!(ext.insert(Marker(1)).is_none());
/// assert_eq!(ext.insert(Marker(2)), Some(Marker(1)));
/// assert_eq!(ext.get::<Marker>(), Some(Marker(2)));
/// ```
pub struct Extensions {
    values: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Extensions {
    /// Create empty storage
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Get a clone of the stored value of type `T`
    pub fn get<T: Clone + Send + Sync + 'static>(&self) -> Option<T> {
        self.values
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref::<T>())
            .cloned()
    }

    /// Store a value, returning the one it replaced
    pub fn insert<T: Send + Sync + 'static>(&mut self, value: T) -> Option<T> {
        self.values
            .insert(TypeId::of::<T>(), Box::new(value))
            .and_then(|old| old.downcast::<T>().ok())
            .map(|boxed| *boxed)
    }

    /// Remove a value, returning whether it existed
    pub fn remove<T: 'static>(&mut self) -> bool {
        self.values.remove(&TypeId::of::<T>()).is_some()
    }

    /// Check if a value of type `T` is stored
    pub fn contains<T: 'static>(&self) -> bool {
        self.values.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Drop every stored value
    pub fn clear(&mut self) {
        self.values.clear();
    }
}

impl Default for Extensions {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Extensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extensions")
            .field("count", &self.values.len())
            .finish()
    }
}
