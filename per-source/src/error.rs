//! Error types for per-source behaviors
//!
//! Source tracking itself never fails: a missing source or a missing ad
//! subsystem simply means nothing is emitted. Errors only come out of the
//! integration surface, when a configuration is rejected or the behavior is
//! installed on a player that is already gone.

/// Result type for per-source operations
pub type Result<T> = std::result::Result<T, BehaviorError>;

/// Rejected configuration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// No change-detect events configured
    #[error("Change-detect event set must not be empty")]
    EmptyChangeDetectSet,

    /// An unstable event is not also a change-detect event
    #[error("Unstable event {0:?} is not in the change-detect set")]
    UnstableNotChangeDetect(String),

    /// No native events configured for interim-event recording
    #[error("Native event set must not be empty")]
    EmptyNativeSet,

    /// An event type listed more than once in one event set
    #[error("Event {event:?} is listed more than once in {set}")]
    DuplicateEvent { set: &'static str, event: String },

    /// Debounce delay of zero would evaluate inside the triggering dispatch
    #[error("Debounce delay must be greater than 0")]
    ZeroDelay,

    /// Configuration text could not be parsed
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

/// Errors from installing or driving per-source behaviors
#[derive(Debug, thiserror::Error)]
pub enum BehaviorError {
    /// Invalid configuration provided
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The player has already been disposed
    #[error("Player has been disposed")]
    PlayerDisposed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::UnstableNotChangeDetect("stalled".to_string());
        assert_eq!(
            err.to_string(),
            "Unstable event \"stalled\" is not in the change-detect set"
        );
    }

    #[test]
    fn test_duplicate_event_display() {
        let err = ConfigError::DuplicateEvent {
            set: "native_events",
            event: "canplay".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Event \"canplay\" is listed more than once in native_events"
        );
    }

    #[test]
    fn test_behavior_error_from_config() {
        let err: BehaviorError = ConfigError::ZeroDelay.into();
        assert!(matches!(err, BehaviorError::Config(ConfigError::ZeroDelay)));
        assert_eq!(
            err.to_string(),
            "Configuration error: Debounce delay must be greater than 0"
        );
    }

    #[test]
    fn test_parse_error_from_serde() {
        let err: ConfigError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
