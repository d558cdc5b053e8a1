//! Follower-side suppression: local interaction blocking, HUD lockdown, and
//! the bypass window.
//!
//! A follower's view replays the leader's interactions, so its own genuine
//! input on the surface is cancelled. Replayed input must still reach host
//! application logic, so discrimination is by origin, never by event type.
//! The bypass window suspends discrimination for the duration of one
//! synthesized control activation.

use crate::host::{ElementId, EventOrigin, HostPage, LocalEvent};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// What the embedder should do with a locally observed event: let the host
/// process it, or stop propagation and prevent its default effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Allow,
    Suppress,
}

/// Observable state of the follower's suppression machinery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuppressionState {
    Unsuppressed,
    Suppressed,
    BypassOpen,
}

/// Owner of the bypass window flag, shared by the replay engine and both
/// suppressors.
///
/// The flag is only reachable through [`with_bypass`](Self::with_bypass), so
/// the window closes when the enclosed activation returns, panic included.
/// On the single host thread that ordering guarantees no genuine event is
/// processed while a stale window is open.
#[derive(Debug, Default)]
pub struct InteractionController {
    bypass: AtomicBool,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bypass_open(&self) -> bool {
        self.bypass.load(Ordering::SeqCst)
    }

    /// Run a synthesized activation with the bypass window open.
    pub fn with_bypass<R>(&self, run: impl FnOnce() -> R) -> R {
        struct CloseOnDrop<'a>(&'a AtomicBool);

        impl Drop for CloseOnDrop<'_> {
            fn drop(&mut self) {
                self.0.store(false, Ordering::SeqCst);
            }
        }

        self.bypass.store(true, Ordering::SeqCst);
        let _close = CloseOnDrop(&self.bypass);
        run()
    }
}

/// Cancels genuine local interaction on the surface while letting synthetic
/// interaction through.
pub struct InteractionSuppressor {
    page: Arc<dyn HostPage>,
    controller: Arc<InteractionController>,
    applied_to: Option<ElementId>,
}

impl InteractionSuppressor {
    pub fn new(page: Arc<dyn HostPage>, controller: Arc<InteractionController>) -> Self {
        Self {
            page,
            controller,
            applied_to: None,
        }
    }

    /// Level-triggered application: locate the surface, disable its touch
    /// gestures, remember the element. Safe to call repeatedly; re-applies
    /// itself when the host has replaced the element.
    pub fn ensure_applied(&mut self) -> bool {
        let Some(surface) = self.page.surface() else {
            self.applied_to = None;
            return false;
        };
        let element = surface.element();
        if self.applied_to != Some(element) {
            surface.set_touch_gestures(false);
            self.applied_to = Some(element);
            tracing::info!(?element, "interaction suppression applied");
        }
        true
    }

    pub fn is_applied(&self) -> bool {
        self.applied_to.is_some()
    }

    /// Decide whether a local event may proceed to the host.
    pub fn filter(&self, event: &LocalEvent) -> Disposition {
        if self.controller.bypass_open() {
            return Disposition::Allow;
        }
        if event.origin == EventOrigin::Synthetic {
            // Replayed input must reach host application logic.
            return Disposition::Allow;
        }
        let Some(surface) = self.applied_to else {
            return Disposition::Allow;
        };
        if !self.page.contains(surface, event.target) {
            return Disposition::Allow;
        }
        Disposition::Suppress
    }
}

/// Locks the zoom HUD down for followers: increase/decrease hidden, reset
/// visible but blocked for genuine activation, toolbar hidden.
pub struct HudSuppressor {
    page: Arc<dyn HostPage>,
    controller: Arc<InteractionController>,
    reset_element: Option<ElementId>,
}

impl HudSuppressor {
    pub fn new(page: Arc<dyn HostPage>, controller: Arc<InteractionController>) -> Self {
        Self {
            page,
            controller,
            reset_element: None,
        }
    }

    /// Level-triggered re-assertion of the suppressed HUD state. The host may
    /// re-render the controls at any time, so every call re-applies the
    /// setters; repeated application has no additional effect.
    pub fn ensure_applied(&mut self) -> bool {
        let Some(hud) = self.page.zoom_hud() else {
            return false;
        };
        hud.increase.set_hidden(true);
        hud.decrease.set_hidden(true);
        hud.reset.set_disabled(true);
        if let Some(toolbar) = self.page.toolbar() {
            toolbar.set_hidden(true);
        }
        let reset = hud.reset.element();
        if self.reset_element != Some(reset) {
            self.reset_element = Some(reset);
            tracing::info!(element = ?reset, "zoom HUD suppression applied");
        }
        true
    }

    pub fn is_applied(&self) -> bool {
        self.reset_element.is_some()
    }

    /// Capturing filter for press/click/release/key-activate on the reset
    /// control: blocked unless the bypass window is open, so only the replay
    /// engine's synthesized activation sequence gets through.
    pub fn filter_control(&self, event: &LocalEvent) -> Disposition {
        if self.controller.bypass_open() {
            return Disposition::Allow;
        }
        match self.reset_element {
            Some(reset) if event.target == reset => Disposition::Suppress,
            _ => Disposition::Allow,
        }
    }
}

/// Combined observable state, per follower session.
pub fn suppression_state(
    interaction: &InteractionSuppressor,
    hud: &HudSuppressor,
    controller: &InteractionController,
) -> SuppressionState {
    if !interaction.is_applied() && !hud.is_applied() {
        SuppressionState::Unsuppressed
    } else if controller.bypass_open() {
        SuppressionState::BypassOpen
    } else {
        SuppressionState::Suppressed
    }
}
