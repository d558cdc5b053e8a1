//! Mirror message wire protocol.
//!
//! Messages travel as JSON with camelCase fields, tagged by `kind`. Every
//! message carries the room key; a receiver ignores messages for other rooms.
//! Coordinates are normalized to the surface's bounding box at capture time
//! and always clamped to the unit square. Messages are plain values and are
//! never mutated after publish.

use crate::geometry::NormalizedPoint;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque key identifying the shared viewing context.
///
/// Derived by the embedder (e.g. from the page path); the engine only ever
/// compares it for equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomKey(String);

impl RoomKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which input family an interaction belongs to.
///
/// Host pages may rely on either the legacy mouse-style events or the native
/// pointer-style ones, so both are captured and replayed under distinct
/// variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InputFamily {
    Legacy,
    Native,
}

/// Phase of a drag interaction, shared by both input families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Down,
    Move,
    Up,
}

/// Modifier keys held during an interaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Modifiers {
    pub alt: bool,
    pub ctrl: bool,
    pub shift: bool,
    pub meta: bool,
}

/// Native-pointer extras; absent for the legacy family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerInfo {
    pub pointer_id: i32,
    pub pointer_kind: String,
    pub pressure: f64,
}

impl PointerInfo {
    /// Defaults used when synthesizing the cross-family counterpart of a
    /// legacy interaction: primary mouse pointer, pressed pressure while a
    /// button is held.
    pub fn mouse_default(buttons_held: bool) -> Self {
        Self {
            pointer_id: 1,
            pointer_kind: "mouse".to_string(),
            pressure: if buttons_held { 0.5 } else { 0.0 },
        }
    }
}

/// Zoom HUD actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ZoomAction {
    Increase,
    Decrease,
    Reset,
}

/// Fields shared by down/move/up messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerPayload {
    pub family: InputFamily,
    #[serde(flatten)]
    pub at: NormalizedPoint,
    pub button: i16,
    pub buttons: u16,
    pub modifiers: Modifiers,
    #[serde(flatten)]
    pub pointer: Option<PointerInfo>,
}

/// Payload of a wheel message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WheelPayload {
    #[serde(flatten)]
    pub at: NormalizedPoint,
    pub delta_x: f64,
    pub delta_y: f64,
    pub modifiers: Modifiers,
}

/// Payload of a zoom-control message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlPayload {
    pub action: ZoomAction,
}

/// Message body, tagged by `kind` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MessageBody {
    Down(PointerPayload),
    Move(PointerPayload),
    Up(PointerPayload),
    Wheel(WheelPayload),
    Control(ControlPayload),
}

impl MessageBody {
    /// Drag phase and payload, for the three pointer variants.
    pub fn as_drag(&self) -> Option<(DragPhase, &PointerPayload)> {
        match self {
            MessageBody::Down(p) => Some((DragPhase::Down, p)),
            MessageBody::Move(p) => Some((DragPhase::Move, p)),
            MessageBody::Up(p) => Some((DragPhase::Up, p)),
            _ => None,
        }
    }

    pub fn drag(phase: DragPhase, payload: PointerPayload) -> Self {
        match phase {
            DragPhase::Down => MessageBody::Down(payload),
            DragPhase::Move => MessageBody::Move(payload),
            DragPhase::Up => MessageBody::Up(payload),
        }
    }
}

/// A single mirrored interaction, as published on the room channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MirrorMessage {
    pub room: RoomKey,
    #[serde(flatten)]
    pub body: MessageBody,
}

impl MirrorMessage {
    pub fn new(room: RoomKey, body: MessageBody) -> Self {
        Self { room, body }
    }
}
