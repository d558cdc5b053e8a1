//! Leader-side capture and publish pipeline.
//!
//! The embedder's page glue forwards raw press/move/release, wheel, and
//! zoom-button interactions here. Both input families flow through one
//! canonical path: the family only selects which drag flag, rate gate, and
//! wire variant are used. Coordinates are normalized against the attached
//! surface's bounding box at capture time; moves and wheel ticks are
//! rate-limited with trailing-edge coalescing; the guard is re-consulted on
//! every event of a drag and a failure ends the drag silently, with no
//! correction message.

pub mod gate;

use crate::channel::RoomChannel;
use crate::clock::Clock;
use crate::geometry::{NormalizedPoint, Point};
use crate::guard::can_mirror;
use crate::host::{direct_hit, HostPage, Surface};
use crate::protocol::{
    ControlPayload, DragPhase, InputFamily, MessageBody, MirrorMessage, Modifiers, PointerInfo,
    PointerPayload, RoomKey, WheelPayload, ZoomAction,
};
use gate::RateGate;
use std::sync::Arc;
use std::time::Duration;

/// Raw pointer interaction forwarded by the host glue.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerSample {
    pub at: Point,
    pub button: i16,
    /// Held-button bitmask; hosts may omit it on down events.
    pub buttons: Option<u16>,
    pub modifiers: Modifiers,
    /// Native-family extras, when the host provides them.
    pub pointer: Option<PointerInfo>,
}

/// Raw wheel tick forwarded by the host glue.
#[derive(Debug, Clone, PartialEq)]
pub struct WheelSample {
    pub at: Point,
    pub delta_x: f64,
    pub delta_y: f64,
    pub modifiers: Modifiers,
}

#[derive(Debug, Default, Clone, Copy)]
struct DragFlags {
    legacy: bool,
    native: bool,
}

impl DragFlags {
    fn get(&self, family: InputFamily) -> bool {
        match family {
            InputFamily::Legacy => self.legacy,
            InputFamily::Native => self.native,
        }
    }

    fn set(&mut self, family: InputFamily, dragging: bool) {
        match family {
            InputFamily::Legacy => self.legacy = dragging,
            InputFamily::Native => self.native = dragging,
        }
    }
}

/// Captures the leader's interactions and publishes them on the room channel.
pub struct Leader {
    page: Arc<dyn HostPage>,
    channel: Arc<dyn RoomChannel>,
    clock: Arc<dyn Clock>,
    room: RoomKey,
    surface: Option<Arc<dyn Surface>>,
    dragging: DragFlags,
    legacy_moves: RateGate<MirrorMessage>,
    native_moves: RateGate<MirrorMessage>,
    wheel_ticks: RateGate<MirrorMessage>,
}

impl Leader {
    pub fn new(
        page: Arc<dyn HostPage>,
        channel: Arc<dyn RoomChannel>,
        room: RoomKey,
        move_interval: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            page,
            channel,
            clock,
            room,
            surface: None,
            dragging: DragFlags::default(),
            legacy_moves: RateGate::new(move_interval),
            native_moves: RateGate::new(move_interval),
            wheel_ticks: RateGate::new(move_interval),
        }
    }

    /// Attach to the current surface, re-attaching if the element was
    /// replaced. Returns true when a live surface is attached.
    pub fn ensure_attached(&mut self) -> bool {
        if let Some(surface) = &self.surface {
            if surface.is_attached() {
                return true;
            }
            tracing::info!("surface replaced; re-attaching");
        }
        match self.page.surface() {
            Some(surface) => {
                tracing::info!(element = ?surface.element(), "leader attached to surface");
                self.surface = Some(surface);
                // Any drag in flight belonged to the old element.
                self.dragging = DragFlags::default();
                true
            }
            None => {
                self.surface = None;
                false
            }
        }
    }

    /// Press on the surface. Consults the guard with a hit-test; when
    /// allowed, starts the per-family drag and publishes a down message.
    pub fn on_down(&mut self, family: InputFamily, sample: &PointerSample) {
        if !self.ensure_attached() {
            return;
        }
        let Some(surface) = self.surface.clone() else {
            return;
        };
        let hit = direct_hit(self.page.as_ref(), surface.as_ref(), sample.at);
        if !self.guard_allows(Some(hit)) {
            tracing::debug!(?family, "guard blocked down");
            return;
        }
        self.dragging.set(family, true);
        let msg = self.drag_message(DragPhase::Down, family, sample, surface.as_ref());
        self.publish(&msg);
    }

    /// Move while dragging. Hit-test and guard are re-validated on every
    /// event; a failure ends the drag silently.
    pub fn on_move(&mut self, family: InputFamily, sample: &PointerSample) {
        if !self.dragging.get(family) {
            return;
        }
        let Some(surface) = self.surface.clone() else {
            self.dragging.set(family, false);
            return;
        };
        if !surface.is_attached()
            || !direct_hit(self.page.as_ref(), surface.as_ref(), sample.at)
            || !self.guard_allows(None)
        {
            self.dragging.set(family, false);
            return;
        }
        let msg = self.drag_message(DragPhase::Move, family, sample, surface.as_ref());
        let now = self.clock.now();
        let fired = match family {
            InputFamily::Legacy => self.legacy_moves.offer(msg, now),
            InputFamily::Native => self.native_moves.offer(msg, now),
        };
        if let Some(msg) = fired {
            self.publish(&msg);
        }
    }

    /// Release. Ends the drag; publishes the up message only if the pointer
    /// is still a direct hit and the guard still passes.
    pub fn on_up(&mut self, family: InputFamily, sample: &PointerSample) {
        if !self.dragging.get(family) {
            return;
        }
        self.dragging.set(family, false);
        let Some(surface) = self.surface.clone() else {
            return;
        };
        if !surface.is_attached()
            || !direct_hit(self.page.as_ref(), surface.as_ref(), sample.at)
            || !self.guard_allows(None)
        {
            return;
        }
        let msg = self.drag_message(DragPhase::Up, family, sample, surface.as_ref());
        self.publish(&msg);
    }

    /// Wheel tick over the surface. Requires a direct hit but no held drag;
    /// rate-limited like moves.
    pub fn on_wheel(&mut self, sample: &WheelSample) {
        if !self.ensure_attached() {
            return;
        }
        let Some(surface) = self.surface.clone() else {
            return;
        };
        if !direct_hit(self.page.as_ref(), surface.as_ref(), sample.at) {
            return;
        }
        let at = NormalizedPoint::from_absolute(sample.at, &surface.bounds());
        let msg = MirrorMessage::new(
            self.room.clone(),
            MessageBody::Wheel(WheelPayload {
                at,
                delta_x: sample.delta_x,
                delta_y: sample.delta_y,
                modifiers: sample.modifiers,
            }),
        );
        let now = self.clock.now();
        if let Some(msg) = self.wheel_ticks.offer(msg, now) {
            self.publish(&msg);
        }
    }

    /// Zoom-button activation. Discrete, so published immediately with no
    /// rate limiting.
    pub fn on_zoom_button(&mut self, action: ZoomAction) {
        let msg = MirrorMessage::new(
            self.room.clone(),
            MessageBody::Control(ControlPayload { action }),
        );
        self.publish(&msg);
    }

    /// Fire any due trailing-edge publishes.
    pub fn pump(&mut self) {
        let now = self.clock.now();
        let mut due = Vec::new();
        for gate in [
            &mut self.legacy_moves,
            &mut self.native_moves,
            &mut self.wheel_ticks,
        ] {
            if let Some(msg) = gate.take_due(now) {
                due.push(msg);
            }
        }
        for msg in &due {
            self.publish(msg);
        }
    }

    /// Periodic reconciliation: re-attach if the surface element was removed
    /// or replaced since the last check.
    pub fn reconcile(&mut self) {
        self.ensure_attached();
    }

    fn guard_allows(&self, hit: Option<bool>) -> bool {
        can_mirror(&self.page.active_tools(), &self.page.cursor_style(), hit)
    }

    fn drag_message(
        &self,
        phase: DragPhase,
        family: InputFamily,
        sample: &PointerSample,
        surface: &dyn Surface,
    ) -> MirrorMessage {
        let at = NormalizedPoint::from_absolute(sample.at, &surface.bounds());
        let buttons = match (phase, sample.buttons) {
            // Hosts sometimes report no bitmask on the press itself.
            (DragPhase::Down, None) => 1u16 << (sample.button.clamp(0, 15) as u32),
            (_, buttons) => buttons.unwrap_or(0),
        };
        let button = match phase {
            DragPhase::Move => 0,
            _ => sample.button,
        };
        let pointer = match family {
            InputFamily::Native => sample.pointer.clone(),
            InputFamily::Legacy => None,
        };
        MirrorMessage::new(
            self.room.clone(),
            MessageBody::drag(
                phase,
                PointerPayload {
                    family,
                    at,
                    button,
                    buttons,
                    modifiers: sample.modifiers,
                    pointer,
                },
            ),
        )
    }

    fn publish(&self, msg: &MirrorMessage) {
        if let Err(error) = self.channel.publish(msg) {
            tracing::warn!(%error, "publish failed; dropping message");
        }
    }
}
