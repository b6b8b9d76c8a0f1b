//! Risk state reconciliation and banner lifecycle.
//!
//! Every accepted mediation result funnels through [`RiskReconciler`], the
//! single source of truth for what the host UI should display. Rapid result
//! churn is coalesced through a short debounce window, and banner show/hide
//! transitions are modeled as an explicit animation state machine so that at
//! most one banner instance can ever exist: while an animation is in flight,
//! new transition requests queue as "latest wins" instead of starting in
//! parallel.

use crate::api::{MediateResponse, RiskLabel};
use std::time::{Duration, Instant};
use tracing::debug;

/// Coalescing window for intermediate updates.
pub const UPDATE_DEBOUNCE: Duration = Duration::from_millis(300);
/// Banner fade/slide-in duration.
pub const SHOW_ANIMATION: Duration = Duration::from_millis(250);
/// Banner fade/slide-out duration.
pub const HIDE_ANIMATION: Duration = Duration::from_millis(150);

/// Display-level risk classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RiskLevel {
    #[default]
    Safe,
    Risky,
    Danger,
}

impl RiskLevel {
    pub fn from_label(label: RiskLabel) -> Self {
        match label {
            RiskLabel::Safe => RiskLevel::Safe,
            RiskLabel::Harmful => RiskLevel::Risky,
            RiskLabel::Dangerous => RiskLevel::Danger,
        }
    }

    /// Score-only variant for collaborators that return a bare score.
    pub fn from_score(score: f64) -> Self {
        if score >= 0.7 {
            RiskLevel::Danger
        } else if score > 0.3 {
            RiskLevel::Risky
        } else {
            RiskLevel::Safe
        }
    }

    pub fn badge(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "SAFE",
            RiskLevel::Risky => "RISKY",
            RiskLevel::Danger => "DANGER",
        }
    }
}

/// Derived display state. Never constructed by hosts; always computed here
/// from an accepted result or a reset.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskState {
    pub level: RiskLevel,
    pub score: f64,
    pub explanation: String,
}

impl Default for RiskState {
    fn default() -> Self {
        Self {
            level: RiskLevel::Safe,
            score: 0.0,
            explanation: String::new(),
        }
    }
}

impl RiskState {
    pub fn from_response(response: &MediateResponse) -> Self {
        Self {
            level: RiskLevel::from_label(response.risk_level),
            score: response.risk_level.score(),
            explanation: response.why.clone(),
        }
    }

    pub fn from_score(score: f64, explanation: impl Into<String>) -> Self {
        Self {
            level: RiskLevel::from_score(score),
            score,
            explanation: explanation.into(),
        }
    }
}

/// Banner animation phase. `Entering`/`Leaving` carry the animation end time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerPhase {
    Hidden,
    Entering { until: Instant },
    Visible,
    Leaving { until: Instant },
}

#[derive(Debug)]
pub struct RiskReconciler {
    state: RiskState,
    pending: Option<(RiskState, Instant)>,
    banner: BannerPhase,
    // Transition requested while an animation was in flight; latest wins.
    queued_visible: Option<bool>,
}

impl Default for RiskReconciler {
    fn default() -> Self {
        Self::new()
    }
}

impl RiskReconciler {
    pub fn new() -> Self {
        Self {
            state: RiskState::default(),
            pending: None,
            banner: BannerPhase::Hidden,
            queued_visible: None,
        }
    }

    pub fn state(&self) -> &RiskState {
        &self.state
    }

    pub fn banner(&self) -> BannerPhase {
        self.banner
    }

    /// True while the banner element exists on screen, including during its
    /// exit animation: a hide is complete only once the animation finishes.
    pub fn banner_visible(&self) -> bool {
        !matches!(self.banner, BannerPhase::Hidden)
    }

    /// Coalesced update for intermediate results. Only the latest update
    /// within the window is applied.
    pub fn update_debounced(&mut self, next: RiskState, now: Instant) {
        self.pending = Some((next, now + UPDATE_DEBOUNCE));
    }

    /// Update for confirmed/final results: cancels any pending debounced
    /// update and applies synchronously.
    pub fn update_immediate(&mut self, next: RiskState, now: Instant) {
        self.pending = None;
        self.apply(next, now);
    }

    /// Force SAFE with no animation. Used when the buffer empties or the
    /// session ends; safe always wins immediately.
    pub fn reset(&mut self) {
        self.pending = None;
        self.queued_visible = None;
        self.state = RiskState::default();
        self.banner = BannerPhase::Hidden;
    }

    /// Advance the debounce window and any in-flight animation.
    pub fn poll(&mut self, now: Instant) {
        if self.pending.as_ref().is_some_and(|(_, deadline)| now >= *deadline) {
            if let Some((next, _)) = self.pending.take() {
                self.apply(next, now);
            }
        }

        match self.banner {
            BannerPhase::Entering { until } if now >= until => {
                self.banner = BannerPhase::Visible;
                self.run_queued(now);
            }
            BannerPhase::Leaving { until } if now >= until => {
                self.banner = BannerPhase::Hidden;
                self.run_queued(now);
            }
            _ => {}
        }
    }

    fn apply(&mut self, next: RiskState, now: Instant) {
        debug!(level = next.level.badge(), score = next.score, "risk state applied");
        let want_visible = next.level != RiskLevel::Safe;
        self.state = next;
        self.request_banner(want_visible, now);
    }

    fn request_banner(&mut self, visible: bool, now: Instant) {
        match self.banner {
            BannerPhase::Hidden => {
                if visible {
                    self.banner = BannerPhase::Entering {
                        until: now + SHOW_ANIMATION,
                    };
                }
            }
            BannerPhase::Visible => {
                if !visible {
                    self.banner = BannerPhase::Leaving {
                        until: now + HIDE_ANIMATION,
                    };
                }
            }
            BannerPhase::Entering { .. } | BannerPhase::Leaving { .. } => {
                self.queued_visible = Some(visible);
            }
        }
    }

    fn run_queued(&mut self, now: Instant) {
        if let Some(visible) = self.queued_visible.take() {
            self.request_banner(visible, now);
        }
    }
}
