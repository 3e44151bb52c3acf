//! Ad-state gate
//!
//! While the host is presenting an advertisement, lifecycle events describe
//! the ad, not the content source, so source tracking is suppressed. The ad
//! subsystem is owned by the host and only ever queried.
//!
//! Three generations of ad integration are supported, chosen once when the
//! subsystem is attached:
//!
//! - **Legacy**: exposes a `state` token; suppressed states come from
//!   [`AdStatePolicy`]
//! - **Modern**: exposes `is_in_ad_mode()`; `loadstart` still passes because
//!   it may legitimately fire mid-ad
//! - **UI flags**: the player's `ad-loading` / `ad-playing` classes

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use media_emitter::Player;
use parking_lot::RwLock;

use crate::config::AdStatePolicy;

/// Player class set while an ad is loading
pub const AD_LOADING_CLASS: &str = "ad-loading";

/// Player class set while an ad is playing
pub const AD_PLAYING_CLASS: &str = "ad-playing";

/// Legacy ad subsystem exposing a single state token
pub trait LegacyAds: Send + Sync {
    /// Current state token, e.g. `"preroll?"`
    fn state(&self) -> Option<String>;
}

/// Modern ad subsystem exposing ad-mode queries
pub trait ModernAds: Send + Sync {
    /// Whether the ad subsystem has taken over playback
    fn is_in_ad_mode(&self) -> bool;

    /// Whether an ad break is currently running
    fn in_ad_break(&self) -> bool;
}

/// The host's ad subsystem, tagged by generation
#[derive(Clone, Default)]
pub enum AdSubsystem {
    /// No ad integration; nothing is ever suppressed
    #[default]
    None,
    Legacy(Arc<dyn LegacyAds>),
    Modern(Arc<dyn ModernAds>),
    /// Read the player's ad UI classes instead of an ad object
    UiFlags,
}

impl AdSubsystem {
    pub fn legacy(ads: impl LegacyAds + 'static) -> Self {
        AdSubsystem::Legacy(Arc::new(ads))
    }

    pub fn modern(ads: impl ModernAds + 'static) -> Self {
        AdSubsystem::Modern(Arc::new(ads))
    }

    /// Short name of the generation, for logging
    pub fn generation(&self) -> &'static str {
        match self {
            AdSubsystem::None => "none",
            AdSubsystem::Legacy(_) => "legacy",
            AdSubsystem::Modern(_) => "modern",
            AdSubsystem::UiFlags => "ui-flags",
        }
    }
}

impl std::fmt::Debug for AdSubsystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("AdSubsystem").field(&self.generation()).finish()
    }
}

/// Decides whether an event arrives during ad playback
#[derive(Debug, Clone, Default)]
pub struct AdGate {
    subsystem: AdSubsystem,
    policy: AdStatePolicy,
}

impl AdGate {
    pub fn new(subsystem: AdSubsystem, policy: AdStatePolicy) -> Self {
        Self { subsystem, policy }
    }

    pub fn subsystem(&self) -> &AdSubsystem {
        &self.subsystem
    }

    pub fn policy(&self) -> &AdStatePolicy {
        &self.policy
    }

    /// Whether source tracking should skip this event
    pub fn should_ignore(&self, player: &Player, event_type: &str) -> bool {
        match &self.subsystem {
            AdSubsystem::None => false,
            AdSubsystem::Legacy(ads) => ads
                .state()
                .map(|state| self.policy.suppresses(&state))
                .unwrap_or(false),
            AdSubsystem::Modern(ads) => ads.is_in_ad_mode() && event_type != "loadstart",
            AdSubsystem::UiFlags => {
                player.has_class(AD_LOADING_CLASS) || player.has_class(AD_PLAYING_CLASS)
            }
        }
    }
}

/// Shared, settable legacy ad state
///
/// Clones share the same state, so a host can keep one handle and attach
/// another.
#[derive(Debug, Clone, Default)]
pub struct LegacyAdState {
    state: Arc<RwLock<Option<String>>>,
}

impl LegacyAdState {
    pub fn new(state: impl Into<String>) -> Self {
        Self {
            state: Arc::new(RwLock::new(Some(state.into()))),
        }
    }

    pub fn set_state(&self, state: impl Into<String>) {
        *self.state.write() = Some(state.into());
    }

    pub fn clear(&self) {
        *self.state.write() = None;
    }
}

impl LegacyAds for LegacyAdState {
    fn state(&self) -> Option<String> {
        self.state.read().clone()
    }
}

/// Shared, settable modern ad state
#[derive(Debug, Clone, Default)]
pub struct ModernAdState {
    in_ad_mode: Arc<AtomicBool>,
    in_ad_break: Arc<AtomicBool>,
}

impl ModernAdState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_in_ad_mode(&self, value: bool) {
        self.in_ad_mode.store(value, Ordering::SeqCst);
    }

    pub fn set_in_ad_break(&self, value: bool) {
        self.in_ad_break.store(value, Ordering::SeqCst);
    }
}

impl ModernAds for ModernAdState {
    fn is_in_ad_mode(&self) -> bool {
        self.in_ad_mode.load(Ordering::SeqCst)
    }

    fn in_ad_break(&self) -> bool {
        self.in_ad_break.load(Ordering::SeqCst)
    }
}
