//! surface-mirror - real-time view synchronization for shared interactive
//! surfaces.
//!
//! One participant (the leader) pans and zooms an interactive surface; every
//! other participant (a follower) sees the same surface move, because the
//! leader's pointer, wheel, and zoom-control interactions are captured,
//! normalized, published on a room channel, and replayed as synthesized input
//! on each follower's surface. Followers' own interaction with the surface is
//! suppressed, except when a synthesized control activation opens the bypass
//! window.
//!
//! The engine is host-agnostic: the hosting page is reached only through the
//! traits in [`host`], and the transport only through [`channel::RoomChannel`].

pub mod capture;
pub mod channel;
pub mod clock;
pub mod error;
pub mod geometry;
pub mod guard;
pub mod host;
pub mod protocol;
pub mod replay;
pub mod session;
pub mod suppress;

pub use capture::{Leader, PointerSample, WheelSample};
pub use channel::{LocalRoomChannel, RoomChannel};
pub use error::{MirrorError, MirrorResult};
pub use protocol::{InputFamily, MirrorMessage, RoomKey, ZoomAction};
pub use replay::Follower;
pub use session::{Role, Session, SessionConfig};
pub use suppress::{Disposition, InteractionController, SuppressionState};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the default tracing subscriber (env-filterable). Quietly a no-op
/// when the embedder already installed one.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "surface_mirror=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
