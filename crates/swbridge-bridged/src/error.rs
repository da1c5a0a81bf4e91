//! Error types for the bridged daemon.

use swbridge_core::BridgeError;
use thiserror::Error;

/// Daemon-level errors.
#[derive(Error, Debug)]
pub enum BridgedError {
    /// Switch configuration file error
    #[error("config error: {0}")]
    Config(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Forwarding core error
    #[error(transparent)]
    Bridge(#[from] BridgeError),

    /// All links are gone; nothing left to receive from
    #[error("data plane closed")]
    LinkClosed,
}

/// Result type for daemon operations.
pub type Result<T> = std::result::Result<T, BridgedError>;
