//! Room channel: best-effort pub/sub transport for mirror messages.
//!
//! The transport gives no delivery guarantee beyond "best effort within the
//! process group" and introduces no reordering: a single publisher's messages
//! reach each subscriber in publish order. Room filtering happens at the
//! receiving end, not in the transport.

use crate::error::MirrorResult;
use crate::protocol::MirrorMessage;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Handler invoked with the raw JSON payload of each delivered message.
pub type RawHandler = Box<dyn Fn(&str) + Send + Sync>;

/// Identifies one subscription for later removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    fn next() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Publish/subscribe transport scoped to one process group.
///
/// `publish` is synchronous and returns immediately; a failure drops that one
/// message and the caller resumes normal operation afterwards.
pub trait RoomChannel: Send + Sync {
    fn publish(&self, msg: &MirrorMessage) -> MirrorResult<()>;

    fn subscribe(&self, handler: RawHandler) -> SubscriptionId;

    fn unsubscribe(&self, id: SubscriptionId);
}

/// In-process channel delivering each published message to every subscriber,
/// synchronously, in publish order.
///
/// Leaders only publish and followers only subscribe, so self-delivery never
/// arises in practice.
#[derive(Default)]
pub struct LocalRoomChannel {
    subscribers: Mutex<HashMap<SubscriptionId, Arc<RawHandler>>>,
}

impl LocalRoomChannel {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RoomChannel for LocalRoomChannel {
    fn publish(&self, msg: &MirrorMessage) -> MirrorResult<()> {
        let payload = serde_json::to_string(msg)?;
        // Snapshot the handlers so a subscriber may unsubscribe from inside
        // its own callback without deadlocking.
        let handlers: Vec<Arc<RawHandler>> = self.subscribers.lock().values().cloned().collect();
        for handler in handlers {
            handler(&payload);
        }
        Ok(())
    }

    fn subscribe(&self, handler: RawHandler) -> SubscriptionId {
        let id = SubscriptionId::next();
        self.subscribers.lock().insert(id, Arc::new(handler));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers.lock().remove(&id);
    }
}
