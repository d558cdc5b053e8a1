//! Host-page abstraction.
//!
//! The engine never touches a real page directly. Everything it needs from
//! the hosting application — locating the surface, hit-testing, dispatching
//! synthesized input, the zoom control triple, the toolbar — sits behind
//! these traits, implemented by the embedder's page glue.

use crate::geometry::{Point, Rect};
use crate::guard::{CursorStyle, Tool};
use crate::protocol::{DragPhase, Modifiers, PointerInfo, ZoomAction};
use std::sync::Arc;

#[cfg(test)]
pub(crate) mod fake;

/// Opaque identity of a host element, stable while the element is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(pub u64);

/// Scope at which a synthetic event is dispatched.
///
/// Host application logic may listen on the surface itself or at broader
/// scopes where continuation tracking typically lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchScope {
    Surface,
    Document,
    Window,
}

/// A synthetic event handed to the host for dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum SyntheticEvent {
    Mouse {
        phase: DragPhase,
        at: Point,
        button: i16,
        buttons: u16,
        modifiers: Modifiers,
    },
    Pointer {
        phase: DragPhase,
        at: Point,
        button: i16,
        buttons: u16,
        modifiers: Modifiers,
        pointer: PointerInfo,
    },
    Wheel {
        at: Point,
        delta_x: f64,
        delta_y: f64,
        modifiers: Modifiers,
    },
}

/// Where a locally observed event came from.
///
/// Discrimination between genuine and replayed input is by origin (the host's
/// trust flag), never by event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOrigin {
    User,
    Synthetic,
}

/// Kinds of local input the follower filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalEventKind {
    MouseDown,
    MouseMove,
    MouseUp,
    PointerDown,
    PointerMove,
    PointerUp,
    Wheel,
    Click,
    ContextMenu,
    DragStart,
    KeyActivate,
}

/// A local event as seen by a capturing filter, before the host acts on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalEvent {
    pub kind: LocalEventKind,
    pub target: ElementId,
    pub origin: EventOrigin,
}

/// The current largest visual surface element.
pub trait Surface: Send + Sync {
    fn element(&self) -> ElementId;

    /// Current bounding box, in host client coordinates.
    fn bounds(&self) -> Rect;

    /// False once the host has removed or replaced the element.
    fn is_attached(&self) -> bool;

    /// Enable or disable host touch-gesture handling on the surface.
    fn set_touch_gestures(&self, enabled: bool);
}

/// One of the zoom HUD controls.
pub trait ZoomControl: Send + Sync {
    fn element(&self) -> ElementId;

    /// Full press/click/release activation sequence. Some host UIs gate
    /// activation on the complete sequence rather than a bare click.
    fn activate(&self);

    fn set_hidden(&self, hidden: bool);

    fn set_disabled(&self, disabled: bool);
}

/// The zoom control triple.
#[derive(Clone)]
pub struct ZoomHud {
    pub increase: Arc<dyn ZoomControl>,
    pub decrease: Arc<dyn ZoomControl>,
    pub reset: Arc<dyn ZoomControl>,
}

impl ZoomHud {
    pub fn control(&self, action: ZoomAction) -> &Arc<dyn ZoomControl> {
        match action {
            ZoomAction::Increase => &self.increase,
            ZoomAction::Decrease => &self.decrease,
            ZoomAction::Reset => &self.reset,
        }
    }
}

/// Optional toolbar element, hidden for followers.
pub trait Toolbar: Send + Sync {
    fn set_hidden(&self, hidden: bool);
}

/// Everything the engine needs from the hosting page.
///
/// All methods re-query live state; the engine never caches surface geometry
/// or control handles across events.
pub trait HostPage: Send + Sync {
    /// Current largest visual surface, if any.
    fn surface(&self) -> Option<Arc<dyn Surface>>;

    /// Topmost element at an absolute point.
    fn topmost_at(&self, point: Point) -> Option<ElementId>;

    /// Whether `el` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: ElementId, el: ElementId) -> bool;

    /// Identifiers of currently active tools.
    fn active_tools(&self) -> Vec<Tool>;

    /// Current cursor style.
    fn cursor_style(&self) -> CursorStyle;

    /// Dispatch a synthetic event at the given scope.
    fn dispatch(&self, scope: DispatchScope, event: &SyntheticEvent);

    /// The zoom control triple, if all three controls are present.
    fn zoom_hud(&self) -> Option<ZoomHud>;

    /// The toolbar, if present.
    fn toolbar(&self) -> Option<Arc<dyn Toolbar>>;
}

/// Direct hit: the topmost element under `point` is the surface itself, not
/// an overlay, dropdown, or other element intercepting the point.
pub fn direct_hit(page: &dyn HostPage, surface: &dyn Surface, point: Point) -> bool {
    surface.bounds().contains(point) && page.topmost_at(point) == Some(surface.element())
}
