//! Input guard: decides whether an interaction is eligible for mirroring.
//!
//! The guard is a pure function over live host state, recomputed per decision.
//! It keeps incidental interactions with unrelated UI (menus, token pickers,
//! overlays floating above the surface) out of the mirror stream.

/// A tool the host page reports as active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tool {
    Pan,
    TokenBrowser,
    StickerBrowser,
    /// Any other tool; its activity blocks mirroring.
    Other(String),
}

impl Tool {
    fn is_allowed(&self) -> bool {
        !matches!(self, Tool::Other(_))
    }

    fn is_pan(&self) -> bool {
        matches!(self, Tool::Pan)
    }
}

/// Host cursor style, as reported by the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CursorStyle(String);

impl CursorStyle {
    pub fn new(style: impl Into<String>) -> Self {
        Self(style.into().to_lowercase())
    }

    /// Whether the cursor indicates an active grab/drag affordance.
    ///
    /// Tolerant matching: hosts spell this "grab", "grabbing", and in one
    /// observed skin "grapping".
    pub fn is_grabbing(&self) -> bool {
        self.0.contains("grab") || self.0.contains("grap")
    }
}

/// Decide whether an interaction is eligible for mirroring.
///
/// Rules, in order (the first failing rule blocks):
/// 1. a grab affordance without the pan tool means some other drag is in
///    flight;
/// 2. a single active tool outside {pan, token browser, sticker browser}
///    blocks the whole interaction, even if a pan tool is also active;
/// 3. when a concrete event is in hand (`hit` is `Some`), the topmost element
///    under it must be the surface itself.
pub fn can_mirror(active_tools: &[Tool], cursor: &CursorStyle, hit: Option<bool>) -> bool {
    if cursor.is_grabbing() && !active_tools.iter().any(Tool::is_pan) {
        return false;
    }
    if active_tools.iter().any(|tool| !tool.is_allowed()) {
        return false;
    }
    if let Some(direct) = hit {
        if !direct {
            return false;
        }
    }
    true
}
