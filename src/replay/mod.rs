//! Follower-side replay engine.
//!
//! Reconstructs the leader's interactions from mirror messages. Coordinates
//! are resolved against the surface's bounding box at replay time, re-queried
//! per message, so replay stays correct across surface resizes between
//! capture and replay. Every drag message fans out to both input families;
//! a down stays on the surface while move/up additionally reach document and
//! window scope, where host continuation tracking typically listens. That
//! asymmetry matches the hosts this engine was built against and is kept
//! deliberately.

use crate::host::{DispatchScope, HostPage, SyntheticEvent};
use crate::protocol::{
    DragPhase, InputFamily, MessageBody, MirrorMessage, PointerInfo, PointerPayload, RoomKey,
    WheelPayload, ZoomAction,
};
use crate::suppress::InteractionController;
use std::sync::Arc;

const BROADCAST_SCOPES: [DispatchScope; 3] = [
    DispatchScope::Surface,
    DispatchScope::Document,
    DispatchScope::Window,
];

/// Replays mirror messages onto the follower's surface.
pub struct Follower {
    page: Arc<dyn HostPage>,
    room: RoomKey,
    controller: Arc<InteractionController>,
}

impl Follower {
    pub fn new(
        page: Arc<dyn HostPage>,
        room: RoomKey,
        controller: Arc<InteractionController>,
    ) -> Self {
        Self {
            page,
            room,
            controller,
        }
    }

    /// Handle one raw payload from the room channel. Malformed payloads are
    /// ignored.
    pub fn on_raw(&self, payload: &str) {
        match serde_json::from_str::<MirrorMessage>(payload) {
            Ok(msg) => self.on_message(&msg),
            Err(error) => tracing::debug!(%error, "ignoring malformed message"),
        }
    }

    /// Handle one decoded mirror message. Foreign-room messages are ignored.
    pub fn on_message(&self, msg: &MirrorMessage) {
        if msg.room != self.room {
            return;
        }
        match &msg.body {
            MessageBody::Down(p) => self.replay_drag(DragPhase::Down, p),
            MessageBody::Move(p) => self.replay_drag(DragPhase::Move, p),
            MessageBody::Up(p) => self.replay_drag(DragPhase::Up, p),
            MessageBody::Wheel(w) => self.replay_wheel(w),
            MessageBody::Control(c) => self.replay_control(c.action),
        }
    }

    fn replay_drag(&self, phase: DragPhase, payload: &PointerPayload) {
        let Some(surface) = self.page.surface() else {
            tracing::debug!("no surface; dropping mirrored interaction");
            return;
        };
        let at = payload.at.to_absolute(&surface.bounds());

        let mouse = SyntheticEvent::Mouse {
            phase,
            at,
            button: payload.button,
            buttons: payload.buttons,
            modifiers: payload.modifiers,
        };
        let pointer_info = payload.pointer.clone().unwrap_or_else(|| {
            PointerInfo::mouse_default(phase == DragPhase::Down || payload.buttons != 0)
        });
        let pointer = SyntheticEvent::Pointer {
            phase,
            at,
            button: payload.button,
            buttons: payload.buttons,
            modifiers: payload.modifiers,
            pointer: pointer_info,
        };

        match phase {
            // A down stays narrow: the message's own family first, then its
            // cross-family counterpart, both on the surface only.
            DragPhase::Down => match payload.family {
                InputFamily::Legacy => {
                    self.page.dispatch(DispatchScope::Surface, &mouse);
                    self.page.dispatch(DispatchScope::Surface, &pointer);
                }
                InputFamily::Native => {
                    self.page.dispatch(DispatchScope::Surface, &pointer);
                    self.page.dispatch(DispatchScope::Surface, &mouse);
                }
            },
            DragPhase::Move | DragPhase::Up => {
                for scope in BROADCAST_SCOPES {
                    self.page.dispatch(scope, &mouse);
                }
                for scope in BROADCAST_SCOPES {
                    self.page.dispatch(scope, &pointer);
                }
            }
        }
    }

    fn replay_wheel(&self, payload: &WheelPayload) {
        let Some(surface) = self.page.surface() else {
            tracing::debug!("no surface; dropping mirrored wheel");
            return;
        };
        let at = payload.at.to_absolute(&surface.bounds());
        let event = SyntheticEvent::Wheel {
            at,
            delta_x: payload.delta_x,
            delta_y: payload.delta_y,
            modifiers: payload.modifiers,
        };
        self.page.dispatch(DispatchScope::Surface, &event);
    }

    fn replay_control(&self, action: ZoomAction) {
        let Some(hud) = self.page.zoom_hud() else {
            tracing::debug!(?action, "no zoom HUD; dropping control activation");
            return;
        };
        match action {
            ZoomAction::Increase | ZoomAction::Decrease => hud.control(action).activate(),
            // The follower's own filter blocks genuine reset activation, so
            // the synthesized sequence runs inside the bypass window.
            ZoomAction::Reset => self.controller.with_bypass(|| hud.reset.activate()),
        }
    }
}
