//! Source-change detection state machine
//!
//! ```text
//!            qualifying event (enabled, not ad-gated)
//!   IDLE ─────────────────────────────────────────────▶ BURST
//!    ▲                                                    │
//!    │   timer fires: reset stability, compare sources    │
//!    └────────────────────────────────────────────────────┘
//!    ▲                                                    │
//!    └──────────────── disable (timer cancelled) ─────────┘
//! ```
//!
//! `DetectorState` holds only the decision-making state. Talking to the
//! player (scheduling, binding, triggering) is the session's job; every
//! transition here is a plain method on `&mut self`.

use tracing::trace;

use crate::burst::{Burst, BurstId};
use crate::classifier::EventClass;

/// Why a change-detect event did not start a burst
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Disabled,
    /// A burst is already open; the event is recorded by its catch-all
    BurstPending,
    AdGated,
    NotQualifying,
    NoSource,
}

/// Outcome of offering an event to the detector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Rejected(Rejection),
    /// A burst should start; `destabilized` means `sourceunstable` is due
    Accepted { destabilized: bool },
}

/// Outcome of evaluating a closed burst
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The source differs from the last reported one
    Changed { from: Option<String>, to: String },
    /// No source, or the same source as before
    Unchanged,
}

/// Mutable per-player detection state
#[derive(Debug)]
pub struct DetectorState {
    cached_src: Option<String>,
    src_stable: bool,
    disabled: bool,
    burst: Option<Burst>,
}

impl DetectorState {
    pub fn new() -> Self {
        Self {
            cached_src: None,
            src_stable: true,
            disabled: false,
            burst: None,
        }
    }

    pub fn cached_src(&self) -> Option<&str> {
        self.cached_src.as_deref()
    }

    pub fn is_src_stable(&self) -> bool {
        self.src_stable
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn burst(&self) -> Option<&Burst> {
        self.burst.as_ref()
    }

    pub fn has_burst(&self) -> bool {
        self.burst.is_some()
    }

    /// Decide whether an event starts a burst
    ///
    /// Stability is updated here: the first unstable event after the source
    /// stabilized flips `src_stable` and asks for `sourceunstable`.
    pub fn admit(&mut self, class: EventClass, ad_gated: bool) -> Admission {
        let rejection = if !class.qualifies() {
            Some(Rejection::NotQualifying)
        } else if self.disabled {
            Some(Rejection::Disabled)
        } else if self.burst.is_some() {
            Some(Rejection::BurstPending)
        } else if ad_gated {
            Some(Rejection::AdGated)
        } else {
            None
        };

        if let Some(rejection) = rejection {
            return Admission::Rejected(rejection);
        }

        let destabilized = self.src_stable && class == EventClass::Unstable;
        if destabilized {
            self.src_stable = false;
        }

        Admission::Accepted { destabilized }
    }

    /// Record the burst that was just opened
    pub fn begin_burst(&mut self, burst: Burst) {
        trace!(burst = burst.id.as_u64(), "burst opened");
        self.burst = Some(burst);
    }

    /// Close the burst whose timer fired
    ///
    /// Returns `None` if `id` is not the open burst, e.g. the burst was
    /// cancelled after its timer was already dequeued.
    pub fn close_burst(&mut self, id: BurstId) -> Option<Burst> {
        match &self.burst {
            Some(burst) if burst.id == id => self.burst.take(),
            _ => None,
        }
    }

    /// Compare the current source against the last reported one
    ///
    /// Always restores stability. Does not touch `cached_src`; call
    /// [`commit`](Self::commit) once the change has been announced.
    pub fn resolve(&mut self, current_src: Option<&str>) -> Resolution {
        self.src_stable = true;

        match current_src {
            Some(to) if !to.is_empty() && self.cached_src.as_deref() != Some(to) => {
                Resolution::Changed {
                    from: self.cached_src.clone(),
                    to: to.to_string(),
                }
            }
            _ => Resolution::Unchanged,
        }
    }

    /// Remember the source that was just announced
    pub fn commit(&mut self, src: String) {
        self.cached_src = Some(src);
    }

    /// Disable detection, handing back any open burst for cancellation
    pub fn disable(&mut self) -> Option<Burst> {
        self.disabled = true;
        self.burst.take()
    }

    pub fn enable(&mut self) {
        self.disabled = false;
    }

    /// Drop the open burst without evaluating it
    pub fn abandon_burst(&mut self) -> Option<Burst> {
        self.burst.take()
    }
}

impl Default for DetectorState {
    fn default() -> Self {
        Self::new()
    }
}
