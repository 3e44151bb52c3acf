//! Events dispatched through an [`Emitter`](crate::Emitter)
//!
//! An `Event` carries its type string and an optional, type-erased payload.
//! Payloads are stored as `Arc<dyn Any>` so that any listener can read them
//! back as the concrete type the emitter attached.

use std::any::Any;
use std::sync::Arc;

/// A single dispatched event
///
/// # Example
///
/// ```rust
/// use media_emitter::Event;
///
/// #[derive(Debug, PartialEq)]
/// struct Progress(u32);
///
/// let event = Event::with_data("progress", Progress(42));
/// assert_eq!(event.event_type, "progress");
/// assert_eq!(event.data::<Progress>(), Some(&Progress(42)));
/// assert!(event.data::<String>().is_none());
/// ```
#[derive(Clone)]
pub struct Event {
    /// The event type, e.g. `"loadstart"`
    pub event_type: String,

    data: Option<Arc<dyn Any + Send + Sync>>,
}

impl Event {
    /// Create an event with no payload
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            data: None,
        }
    }

    /// Create an event carrying a payload
    pub fn with_data<T: Any + Send + Sync>(event_type: impl Into<String>, data: T) -> Self {
        Self {
            event_type: event_type.into(),
            data: Some(Arc::new(data)),
        }
    }

    /// Read the payload back as `T`
    ///
    /// Returns `None` if there is no payload or it is of another type.
    pub fn data<T: Any>(&self) -> Option<&T> {
        self.data.as_ref()?.downcast_ref::<T>()
    }

    /// Whether a payload is attached
    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }

    /// Check the event type
    pub fn is(&self, event_type: &str) -> bool {
        self.event_type == event_type
    }
}

impl std::fmt::Debug for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Event")
            .field("event_type", &self.event_type)
            .field("has_data", &self.has_data())
            .finish()
    }
}

impl From<&str> for Event {
    fn from(event_type: &str) -> Self {
        Event::new(event_type)
    }
}

impl From<String> for Event {
    fn from(event_type: String) -> Self {
        Event::new(event_type)
    }
}

/// Conversion into the list of event types a listener binds to
///
/// Lets `on`, `one` and `off` accept a single type or several at once.
pub trait IntoEventTypes {
    fn into_event_types(self) -> Vec<String>;
}

impl IntoEventTypes for &str {
    fn into_event_types(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl IntoEventTypes for String {
    fn into_event_types(self) -> Vec<String> {
        vec![self]
    }
}

impl IntoEventTypes for &String {
    fn into_event_types(self) -> Vec<String> {
        vec![self.clone()]
    }
}

impl IntoEventTypes for &[&str] {
    fn into_event_types(self) -> Vec<String> {
        self.iter().map(|s| s.to_string()).collect()
    }
}

impl<const N: usize> IntoEventTypes for [&str; N] {
    fn into_event_types(self) -> Vec<String> {
        self.iter().map(|s| s.to_string()).collect()
    }
}

impl<const N: usize> IntoEventTypes for &[&str; N] {
    fn into_event_types(self) -> Vec<String> {
        self.iter().map(|s| s.to_string()).collect()
    }
}

impl IntoEventTypes for Vec<&str> {
    fn into_event_types(self) -> Vec<String> {
        self.into_iter().map(str::to_string).collect()
    }
}

impl IntoEventTypes for Vec<String> {
    fn into_event_types(self) -> Vec<String> {
        self
    }
}

impl IntoEventTypes for &[String] {
    fn into_event_types(self) -> Vec<String> {
        self.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Payload(u8);

    #[test]
    fn test_event_without_data() {
        let event = Event::new("play");

        assert!(event.is("play"));
        assert!(!event.has_data());
        assert!(event.data::<Payload>().is_none());
    }

    #[test]
    fn test_event_data_downcast() {
        let event = Event::with_data("custom", Payload(7));

        assert_eq!(event.data::<Payload>(), Some(&Payload(7)));
        assert!(event.data::<u32>().is_none());

        // Clones share the payload
        let cloned = event.clone();
        assert_eq!(cloned.data::<Payload>(), Some(&Payload(7)));
    }

    #[test]
    fn test_into_event_types() {
        assert_eq!("play".into_event_types(), vec!["play"]);
        assert_eq!(["abort", "emptied"].into_event_types(), vec!["abort", "emptied"]);
        assert_eq!(
            vec!["a".to_string(), "b".to_string()].into_event_types(),
            vec!["a", "b"]
        );
    }
}
