//! In-memory fake host page, the shared fixture for engine tests.

use super::{
    DispatchScope, ElementId, HostPage, Surface, SyntheticEvent, Toolbar, ZoomControl, ZoomHud,
};
use crate::geometry::{Point, Rect};
use crate::guard::{CursorStyle, Tool};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_ELEMENT: AtomicU64 = AtomicU64::new(1);

fn next_element() -> ElementId {
    ElementId(NEXT_ELEMENT.fetch_add(1, Ordering::Relaxed))
}

pub(crate) struct FakeSurface {
    element: ElementId,
    bounds: Mutex<Rect>,
    attached: AtomicBool,
    touch_gestures: AtomicBool,
}

impl FakeSurface {
    fn new(bounds: Rect) -> Arc<Self> {
        Arc::new(Self {
            element: next_element(),
            bounds: Mutex::new(bounds),
            attached: AtomicBool::new(true),
            touch_gestures: AtomicBool::new(true),
        })
    }

    pub fn set_bounds(&self, bounds: Rect) {
        *self.bounds.lock() = bounds;
    }

    pub fn touch_gestures_enabled(&self) -> bool {
        self.touch_gestures.load(Ordering::SeqCst)
    }

    fn detach(&self) {
        self.attached.store(false, Ordering::SeqCst);
    }
}

impl Surface for FakeSurface {
    fn element(&self) -> ElementId {
        self.element
    }

    fn bounds(&self) -> Rect {
        *self.bounds.lock()
    }

    fn is_attached(&self) -> bool {
        self.attached.load(Ordering::SeqCst)
    }

    fn set_touch_gestures(&self, enabled: bool) {
        self.touch_gestures.store(enabled, Ordering::SeqCst);
    }
}

pub(crate) struct FakeControl {
    element: ElementId,
    hidden: AtomicBool,
    disabled: AtomicBool,
    activations: Mutex<Vec<&'static str>>,
    on_activate: Mutex<Option<Box<dyn Fn() + Send + Sync>>>,
}

impl FakeControl {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            element: next_element(),
            hidden: AtomicBool::new(false),
            disabled: AtomicBool::new(false),
            activations: Mutex::new(Vec::new()),
            on_activate: Mutex::new(None),
        })
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden.load(Ordering::SeqCst)
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::SeqCst)
    }

    pub fn activations(&self) -> Vec<&'static str> {
        self.activations.lock().clone()
    }

    /// Hook invoked in the middle of an activation sequence, so tests can
    /// observe state while a synthesized activation is in flight.
    pub fn set_on_activate(&self, hook: impl Fn() + Send + Sync + 'static) {
        *self.on_activate.lock() = Some(Box::new(hook));
    }
}

impl ZoomControl for FakeControl {
    fn element(&self) -> ElementId {
        self.element
    }

    fn activate(&self) {
        self.activations.lock().push("press");
        if let Some(hook) = &*self.on_activate.lock() {
            hook();
        }
        let mut log = self.activations.lock();
        log.push("click");
        log.push("release");
    }

    fn set_hidden(&self, hidden: bool) {
        self.hidden.store(hidden, Ordering::SeqCst);
    }

    fn set_disabled(&self, disabled: bool) {
        self.disabled.store(disabled, Ordering::SeqCst);
    }
}

pub(crate) struct FakeToolbar {
    hidden: AtomicBool,
}

impl FakeToolbar {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            hidden: AtomicBool::new(false),
        })
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden.load(Ordering::SeqCst)
    }
}

impl Toolbar for FakeToolbar {
    fn set_hidden(&self, hidden: bool) {
        self.hidden.store(hidden, Ordering::SeqCst);
    }
}

pub(crate) struct FakeHud {
    pub increase: Arc<FakeControl>,
    pub decrease: Arc<FakeControl>,
    pub reset: Arc<FakeControl>,
}

impl FakeHud {
    fn new() -> Self {
        Self {
            increase: FakeControl::new(),
            decrease: FakeControl::new(),
            reset: FakeControl::new(),
        }
    }
}

pub(crate) struct FakePage {
    surface: Mutex<Option<Arc<FakeSurface>>>,
    overlay: Mutex<Option<ElementId>>,
    children: Mutex<Vec<(ElementId, ElementId)>>,
    tools: Mutex<Vec<Tool>>,
    cursor: Mutex<CursorStyle>,
    dispatches: Mutex<Vec<(DispatchScope, SyntheticEvent)>>,
    hud: Mutex<Option<Arc<FakeHud>>>,
    toolbar: Mutex<Option<Arc<FakeToolbar>>>,
}

impl FakePage {
    pub fn new(bounds: Rect) -> Arc<Self> {
        Arc::new(Self {
            surface: Mutex::new(Some(FakeSurface::new(bounds))),
            overlay: Mutex::new(None),
            children: Mutex::new(Vec::new()),
            tools: Mutex::new(vec![Tool::Pan]),
            cursor: Mutex::new(CursorStyle::new("default")),
            dispatches: Mutex::new(Vec::new()),
            hud: Mutex::new(None),
            toolbar: Mutex::new(None),
        })
    }

    pub fn surface_handle(&self) -> Arc<FakeSurface> {
        self.surface.lock().as_ref().expect("surface present").clone()
    }

    pub fn remove_surface(&self) {
        if let Some(old) = self.surface.lock().take() {
            old.detach();
        }
    }

    /// Detach the current surface and install a fresh element, as the host
    /// does on re-render.
    pub fn replace_surface(&self, bounds: Rect) -> Arc<FakeSurface> {
        let fresh = FakeSurface::new(bounds);
        let mut slot = self.surface.lock();
        if let Some(old) = slot.take() {
            old.detach();
        }
        *slot = Some(fresh.clone());
        fresh
    }

    /// Make an overlay the topmost element everywhere on the page.
    pub fn cover_with_overlay(&self) -> ElementId {
        let id = next_element();
        *self.overlay.lock() = Some(id);
        id
    }

    pub fn clear_overlay(&self) {
        *self.overlay.lock() = None;
    }

    pub fn add_child_of_surface(&self) -> ElementId {
        let parent = self.surface_handle().element;
        let id = next_element();
        self.children.lock().push((parent, id));
        id
    }

    pub fn set_tools(&self, tools: Vec<Tool>) {
        *self.tools.lock() = tools;
    }

    pub fn set_cursor(&self, style: &str) {
        *self.cursor.lock() = CursorStyle::new(style);
    }

    pub fn install_hud(&self) -> Arc<FakeHud> {
        let hud = Arc::new(FakeHud::new());
        *self.hud.lock() = Some(hud.clone());
        hud
    }

    /// Fresh control elements, as the host produces on a HUD re-render.
    pub fn replace_hud(&self) -> Arc<FakeHud> {
        self.install_hud()
    }

    pub fn install_toolbar(&self) -> Arc<FakeToolbar> {
        let toolbar = FakeToolbar::new();
        *self.toolbar.lock() = Some(toolbar.clone());
        toolbar
    }

    pub fn dispatches(&self) -> Vec<(DispatchScope, SyntheticEvent)> {
        self.dispatches.lock().clone()
    }
}

impl HostPage for FakePage {
    fn surface(&self) -> Option<Arc<dyn Surface>> {
        self.surface
            .lock()
            .as_ref()
            .map(|s| s.clone() as Arc<dyn Surface>)
    }

    fn topmost_at(&self, point: Point) -> Option<ElementId> {
        if let Some(overlay) = *self.overlay.lock() {
            return Some(overlay);
        }
        let surface = self.surface.lock().clone()?;
        if surface.is_attached() && surface.bounds().contains(point) {
            Some(surface.element)
        } else {
            None
        }
    }

    fn contains(&self, ancestor: ElementId, el: ElementId) -> bool {
        ancestor == el
            || self
                .children
                .lock()
                .iter()
                .any(|&(parent, child)| parent == ancestor && child == el)
    }

    fn active_tools(&self) -> Vec<Tool> {
        self.tools.lock().clone()
    }

    fn cursor_style(&self) -> CursorStyle {
        self.cursor.lock().clone()
    }

    fn dispatch(&self, scope: DispatchScope, event: &SyntheticEvent) {
        self.dispatches.lock().push((scope, event.clone()));
    }

    fn zoom_hud(&self) -> Option<ZoomHud> {
        self.hud.lock().as_ref().map(|hud| ZoomHud {
            increase: hud.increase.clone() as Arc<dyn ZoomControl>,
            decrease: hud.decrease.clone() as Arc<dyn ZoomControl>,
            reset: hud.reset.clone() as Arc<dyn ZoomControl>,
        })
    }

    fn toolbar(&self) -> Option<Arc<dyn Toolbar>> {
        self.toolbar
            .lock()
            .as_ref()
            .map(|t| t.clone() as Arc<dyn Toolbar>)
    }
}
