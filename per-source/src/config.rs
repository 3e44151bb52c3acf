//! Configuration for per-source behaviors
//!
//! Defines which lifecycle events are watched, how long a burst is
//! debounced, and which legacy ad states suppress source tracking.

use std::collections::HashSet;

use media_emitter::NATIVE_EVENTS;
use serde::{Deserialize, Serialize};

use crate::classifier::{EXTENDED_CHANGE_DETECT_EVENTS, MINIMAL_CHANGE_DETECT_EVENTS, UNSTABLE_EVENTS};
use crate::error::ConfigError;

/// Legacy ad states that suppress source tracking by default
pub const STANDARD_AD_STATES: &[&str] = &["ad-playback", "ads-ready?", "postroll?", "preroll?"];

/// Which legacy ad-subsystem states count as "in an ad"
///
/// Observed revisions of the ad integration disagree on the exact token
/// list (`ads-ready?` versus `ads-ready`), so the set is selectable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AdStatePolicy {
    /// `ad-playback`, `ads-ready?`, `postroll?`, `preroll?`
    #[default]
    Standard,
    /// Standard plus the settled `ads-ready` state
    Inclusive,
    /// Exactly the listed states
    Custom(Vec<String>),
}

impl AdStatePolicy {
    /// The suppressed state tokens
    pub fn tokens(&self) -> Vec<String> {
        match self {
            AdStatePolicy::Standard => STANDARD_AD_STATES.iter().map(|s| s.to_string()).collect(),
            AdStatePolicy::Inclusive => STANDARD_AD_STATES
                .iter()
                .copied()
                .chain(std::iter::once("ads-ready"))
                .map(str::to_string)
                .collect(),
            AdStatePolicy::Custom(tokens) => tokens.clone(),
        }
    }

    /// Whether a legacy ad state suppresses source tracking
    pub fn suppresses(&self, state: &str) -> bool {
        match self {
            AdStatePolicy::Standard => STANDARD_AD_STATES.contains(&state),
            AdStatePolicy::Inclusive => state == "ads-ready" || STANDARD_AD_STATES.contains(&state),
            AdStatePolicy::Custom(tokens) => tokens.iter().any(|token| token == state),
        }
    }
}

/// Configuration for per-source behaviors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Events that may signal a source swap
    /// Default: abort, emptied, loadstart, play
    pub change_detect_events: Vec<String>,

    /// Change-detect events that mark the source unstable
    /// Default: abort, emptied
    pub unstable_events: Vec<String>,

    /// Events recorded as interim events while a burst is open
    /// Default: every media element lifecycle event
    pub native_events: Vec<String>,

    /// Delay between burst start and evaluation, in milliseconds
    /// Default: 1 (next tick)
    pub debounce_delay_ms: u64,

    /// Legacy ad states that suppress tracking
    /// Default: Standard
    pub ad_policy: AdStatePolicy,

    /// Refuse to start a burst while there is no source
    /// Default: false
    pub require_source_to_start_burst: bool,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            change_detect_events: to_strings(MINIMAL_CHANGE_DETECT_EVENTS),
            unstable_events: to_strings(UNSTABLE_EVENTS),
            native_events: to_strings(NATIVE_EVENTS),
            debounce_delay_ms: 1,
            ad_policy: AdStatePolicy::Standard,
            require_source_to_start_burst: false,
        }
    }
}

impl BehaviorConfig {
    /// Create a BehaviorConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// The default, four-event change-detect set
    pub fn minimal() -> Self {
        Self::default()
    }

    /// Watch every early-lifecycle event for lower detection latency
    pub fn extended() -> Self {
        Self {
            change_detect_events: to_strings(EXTENDED_CHANGE_DETECT_EVENTS),
            ..Default::default()
        }
    }

    pub fn with_change_detect_events<I, S>(mut self, events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.change_detect_events = events.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_unstable_events<I, S>(mut self, events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unstable_events = events.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_debounce_delay_ms(mut self, delay_ms: u64) -> Self {
        self.debounce_delay_ms = delay_ms;
        self
    }

    pub fn with_ad_policy(mut self, policy: AdStatePolicy) -> Self {
        self.ad_policy = policy;
        self
    }

    pub fn with_require_source_to_start_burst(mut self, required: bool) -> Self {
        self.require_source_to_start_burst = required;
        self
    }

    /// Validate the configuration and return any issues
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.change_detect_events.is_empty() {
            return Err(ConfigError::EmptyChangeDetectSet);
        }

        if let Some(stray) = self
            .unstable_events
            .iter()
            .find(|event| !self.change_detect_events.contains(*event))
        {
            return Err(ConfigError::UnstableNotChangeDetect(stray.clone()));
        }

        if self.native_events.is_empty() {
            return Err(ConfigError::EmptyNativeSet);
        }

        for (set, events) in [
            ("change_detect_events", &self.change_detect_events),
            ("unstable_events", &self.unstable_events),
            ("native_events", &self.native_events),
        ] {
            if let Some(event) = first_duplicate(events) {
                return Err(ConfigError::DuplicateEvent {
                    set,
                    event: event.clone(),
                });
            }
        }

        if self.debounce_delay_ms == 0 {
            return Err(ConfigError::ZeroDelay);
        }

        Ok(())
    }

    /// Parse a JSON configuration, filling omitted fields with defaults
    ///
    /// ```rust
    /// use per_source::BehaviorConfig;
    ///
    /// let config = BehaviorConfig::from_json(r#"{ "debounce_delay_ms": 5 }"#).unwrap();
    /// assert_eq!(config.debounce_delay_ms, 5);
    /// assert_eq!(config.change_detect_events.len(), 4);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

fn to_strings(events: &[&str]) -> Vec<String> {
    events.iter().map(|s| s.to_string()).collect()
}

/// Listeners are bound once per listed type, so a repeat means double delivery
fn first_duplicate(events: &[String]) -> Option<&String> {
    let mut seen = HashSet::new();
    events.iter().find(|event| !seen.insert(event.as_str()))
}
