//! Error types for the forwarding core.

use crate::PortId;
use thiserror::Error;

/// Per-frame processing errors.
///
/// None of these are fatal to the switch: the daemon logs the error, drops
/// the frame and keeps processing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// Frame shorter than the minimum decodable header.
    #[error("frame too short: {len} bytes, need at least {need}")]
    FrameTooShort { len: usize, need: usize },

    /// A port index with no entry in the switch configuration.
    #[error("port {0} is not in the switch configuration")]
    UnknownPort(PortId),
}

/// Result type for forwarding core operations.
pub type Result<T> = std::result::Result<T, BridgeError>;
