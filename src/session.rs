//! Session wiring.
//!
//! The embedder resolves role and room from page context and hands them in;
//! the session assembles the leader or follower pipeline over a room channel
//! and drives the periodic reconciliation pump. Reconciliation is
//! level-triggered: every pass re-asserts the desired state (surface
//! attachment, suppression) and is a no-op when nothing changed.

use crate::capture::Leader;
use crate::channel::{RoomChannel, SubscriptionId};
use crate::clock::{Clock, SystemClock};
use crate::host::HostPage;
use crate::protocol::RoomKey;
use crate::replay::Follower;
use crate::suppress::{
    suppression_state, HudSuppressor, InteractionController, InteractionSuppressor,
    SuppressionState,
};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Participant role, resolved by the embedder (e.g. from a URL parameter);
/// the engine never recomputes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    Leader,
    Follower,
}

pub const DEFAULT_MOVE_INTERVAL_MS: u64 = 8;
pub const DEFAULT_RECONCILE_INTERVAL_MS: u64 = 2_000;

/// Session configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    pub role: Role,
    pub room: RoomKey,
    /// Rate-limit window for move and wheel publishes.
    #[serde(default = "default_move_interval_ms")]
    pub move_interval_ms: u64,
    /// How often surface attachment and suppression are re-asserted.
    #[serde(default = "default_reconcile_interval_ms")]
    pub reconcile_interval_ms: u64,
}

fn default_move_interval_ms() -> u64 {
    DEFAULT_MOVE_INTERVAL_MS
}

fn default_reconcile_interval_ms() -> u64 {
    DEFAULT_RECONCILE_INTERVAL_MS
}

impl SessionConfig {
    pub fn new(role: Role, room: RoomKey) -> Self {
        Self {
            role,
            room,
            move_interval_ms: DEFAULT_MOVE_INTERVAL_MS,
            reconcile_interval_ms: DEFAULT_RECONCILE_INTERVAL_MS,
        }
    }

    pub fn move_interval(&self) -> Duration {
        Duration::from_millis(self.move_interval_ms)
    }

    pub fn reconcile_interval(&self) -> Duration {
        Duration::from_millis(self.reconcile_interval_ms)
    }
}

struct FollowerSide {
    replay: Arc<Follower>,
    interaction: Arc<Mutex<InteractionSuppressor>>,
    hud: Arc<Mutex<HudSuppressor>>,
    controller: Arc<InteractionController>,
}

enum Side {
    Leader(Arc<Mutex<Leader>>),
    Follower(FollowerSide),
}

/// One participant's running mirror session.
pub struct Session {
    config: SessionConfig,
    channel: Arc<dyn RoomChannel>,
    side: Side,
    subscription: Option<SubscriptionId>,
    running: AtomicBool,
}

impl Session {
    /// Assemble and start a session with the wall clock.
    pub fn start(
        config: SessionConfig,
        page: Arc<dyn HostPage>,
        channel: Arc<dyn RoomChannel>,
    ) -> Self {
        Self::start_with_clock(config, page, channel, Arc::new(SystemClock))
    }

    pub fn start_with_clock(
        config: SessionConfig,
        page: Arc<dyn HostPage>,
        channel: Arc<dyn RoomChannel>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        tracing::info!(role = ?config.role, room = %config.room, "mirror session starting");
        let (side, subscription) = match config.role {
            Role::Leader => {
                let mut leader = Leader::new(
                    page,
                    channel.clone(),
                    config.room.clone(),
                    config.move_interval(),
                    clock,
                );
                leader.ensure_attached();
                (Side::Leader(Arc::new(Mutex::new(leader))), None)
            }
            Role::Follower => {
                let controller = Arc::new(InteractionController::new());
                let replay = Arc::new(Follower::new(
                    page.clone(),
                    config.room.clone(),
                    controller.clone(),
                ));
                let mut interaction =
                    InteractionSuppressor::new(page.clone(), controller.clone());
                let mut hud = HudSuppressor::new(page, controller.clone());
                interaction.ensure_applied();
                hud.ensure_applied();

                let sink = replay.clone();
                let subscription = channel.subscribe(Box::new(move |raw| sink.on_raw(raw)));
                (
                    Side::Follower(FollowerSide {
                        replay,
                        interaction: Arc::new(Mutex::new(interaction)),
                        hud: Arc::new(Mutex::new(hud)),
                        controller,
                    }),
                    Some(subscription),
                )
            }
        };
        Self {
            config,
            channel,
            side,
            subscription,
            running: AtomicBool::new(true),
        }
    }

    /// Leader pipeline handle, for the embedder to forward raw interactions
    /// into. `None` on follower sessions.
    pub fn leader(&self) -> Option<Arc<Mutex<Leader>>> {
        match &self.side {
            Side::Leader(leader) => Some(leader.clone()),
            Side::Follower(_) => None,
        }
    }

    /// Follower replay engine handle. `None` on leader sessions.
    pub fn follower(&self) -> Option<Arc<Follower>> {
        match &self.side {
            Side::Follower(f) => Some(f.replay.clone()),
            Side::Leader(_) => None,
        }
    }

    /// Filter for genuine local input on the surface; the embedder consults
    /// it in the capture phase before the host sees the event.
    pub fn interaction_suppressor(&self) -> Option<Arc<Mutex<InteractionSuppressor>>> {
        match &self.side {
            Side::Follower(f) => Some(f.interaction.clone()),
            Side::Leader(_) => None,
        }
    }

    /// Filter for genuine activation of the reset control.
    pub fn hud_suppressor(&self) -> Option<Arc<Mutex<HudSuppressor>>> {
        match &self.side {
            Side::Follower(f) => Some(f.hud.clone()),
            Side::Leader(_) => None,
        }
    }

    pub fn suppression_state(&self) -> SuppressionState {
        match &self.side {
            Side::Leader(_) => SuppressionState::Unsuppressed,
            Side::Follower(f) => {
                suppression_state(&f.interaction.lock(), &f.hud.lock(), &f.controller)
            }
        }
    }

    /// One reconciliation pass: trailing-edge fires, surface re-attachment,
    /// suppression re-assertion.
    pub fn reconcile(&self) {
        match &self.side {
            Side::Leader(leader) => {
                let mut leader = leader.lock();
                leader.pump();
                leader.reconcile();
            }
            Side::Follower(f) => {
                f.interaction.lock().ensure_applied();
                f.hud.lock().ensure_applied();
            }
        }
    }

    /// Notification from the embedder that the page structure changed.
    pub fn notify_dom_changed(&self) {
        self.reconcile();
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        tracing::info!("mirror session stopped");
    }

    /// Drive the session until [`stop`](Self::stop): trailing-edge publishes
    /// every move interval, full reconciliation every reconcile interval.
    pub async fn run(self: Arc<Self>) {
        let mut pump = tokio::time::interval(self.config.move_interval());
        pump.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let reconcile_every =
            (self.config.reconcile_interval_ms / self.config.move_interval_ms.max(1)).max(1);
        let mut ticks: u64 = 0;

        tracing::info!("session pump running");
        while self.is_running() {
            pump.tick().await;
            ticks += 1;
            match &self.side {
                Side::Leader(leader) => {
                    let mut leader = leader.lock();
                    leader.pump();
                    if ticks % reconcile_every == 0 {
                        leader.reconcile();
                    }
                }
                Side::Follower(f) => {
                    if ticks % reconcile_every == 0 {
                        f.interaction.lock().ensure_applied();
                        f.hud.lock().ensure_applied();
                    }
                }
            }
        }
        tracing::info!("session pump stopped");
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.channel.unsubscribe(id);
        }
    }
}
