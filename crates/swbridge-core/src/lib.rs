//! Forwarding core of the swbridge software Ethernet switch.
//!
//! Two tightly coupled pieces live here:
//!
//! - [`frame`]: bit-exact parsing and transformation of Ethernet/802.1Q
//!   headers (tag insertion and removal).
//! - [`forwarding`]: the VLAN-aware forwarding engine, which owns the
//!   [`fdb`] learning table and turns one received frame into zero or more
//!   `(egress port, outbound frame)` actions.
//!
//! The core is synchronous and free of I/O; the daemon crate wires it to a
//! data plane.

pub mod error;
pub mod fdb;
pub mod forwarding;
pub mod frame;

pub use error::{BridgeError, Result};
pub use fdb::{FdbTable, LearnOutcome};
pub use forwarding::{ForwardingEngine, FrameAction, PortProfile};
pub use frame::EthernetHeader;

/// Index of a switch port in the configured port table.
pub type PortId = usize;
