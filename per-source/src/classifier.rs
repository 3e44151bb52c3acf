//! Lifecycle event classification
//!
//! Only a handful of media lifecycle events hint that the source may be
//! swapping. Those are "change-detect" events; the subset that strongly
//! suggests a swap is underway is "unstable". Everything else is ignored.

use std::collections::HashSet;

use crate::config::BehaviorConfig;
use crate::error::ConfigError;

/// Change-detect events that catch a source swap in nearly every browser
pub const MINIMAL_CHANGE_DETECT_EVENTS: &[&str] = &["abort", "emptied", "loadstart", "play"];

/// Wider change-detect set: lower latency, more wake-ups
pub const EXTENDED_CHANGE_DETECT_EVENTS: &[&str] = &[
    "abort",
    "canplay",
    "emptied",
    "loadeddata",
    "loadedmetadata",
    "loadstart",
    "play",
    "playing",
];

/// Events that mark the source as unstable
pub const UNSTABLE_EVENTS: &[&str] = &["abort", "emptied"];

/// Class of a raw lifecycle event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventClass {
    /// May signal an upcoming source swap
    ChangeDetect,
    /// Change-detect event that strongly suggests a swap is starting
    Unstable,
    /// Not relevant to source tracking
    Ignored,
}

impl EventClass {
    /// Whether this event may start a burst
    pub fn qualifies(&self) -> bool {
        !matches!(self, EventClass::Ignored)
    }
}

/// Maps event types to their [`EventClass`]
#[derive(Debug, Clone)]
pub struct EventClassifier {
    change_detect: HashSet<String>,
    unstable: HashSet<String>,
}

impl EventClassifier {
    /// Build a classifier
    ///
    /// Fails if `change_detect` is empty or `unstable` is not a subset of it.
    pub fn new<I, J, S, T>(change_detect: I, unstable: J) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        let change_detect: HashSet<String> = change_detect.into_iter().map(Into::into).collect();
        let unstable: HashSet<String> = unstable.into_iter().map(Into::into).collect();

        if change_detect.is_empty() {
            return Err(ConfigError::EmptyChangeDetectSet);
        }

        // Report the first offender in a stable order
        let mut stray: Vec<&String> = unstable.difference(&change_detect).collect();
        stray.sort();
        if let Some(event) = stray.first() {
            return Err(ConfigError::UnstableNotChangeDetect((*event).clone()));
        }

        Ok(Self {
            change_detect,
            unstable,
        })
    }

    /// Build a classifier from a configuration's event sets
    pub fn from_config(config: &BehaviorConfig) -> Result<Self, ConfigError> {
        Self::new(
            config.change_detect_events.iter().cloned(),
            config.unstable_events.iter().cloned(),
        )
    }

    /// Classify an event type
    pub fn classify(&self, event_type: &str) -> EventClass {
        if self.unstable.contains(event_type) {
            EventClass::Unstable
        } else if self.change_detect.contains(event_type) {
            EventClass::ChangeDetect
        } else {
            EventClass::Ignored
        }
    }

    pub fn is_change_detect(&self, event_type: &str) -> bool {
        self.change_detect.contains(event_type)
    }

    pub fn is_unstable(&self, event_type: &str) -> bool {
        self.unstable.contains(event_type)
    }
}

impl Default for EventClassifier {
    fn default() -> Self {
        Self {
            change_detect: MINIMAL_CHANGE_DETECT_EVENTS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            unstable: UNSTABLE_EVENTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}
