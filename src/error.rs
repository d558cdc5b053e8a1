//! Error types for the mirroring engine.
//!
//! The event path degrades silently: a missing surface or control makes the
//! operation a no-op for that tick and reconciliation retries later. These
//! variants surface only at the channel and session seams.

use thiserror::Error;

/// Errors that can occur at the mirroring seams.
#[derive(Error, Debug)]
pub enum MirrorError {
    #[error("room channel closed: {0}")]
    ChannelClosed(String),

    #[error("message encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("no visual surface present")]
    SurfaceMissing,

    #[error("zoom controls not found")]
    ControlsMissing,

    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Result type for mirroring operations.
pub type MirrorResult<T> = Result<T, MirrorError>;
