//! Common types for the swbridge software Ethernet switch.
//!
//! This crate provides type-safe representations of the primitives shared
//! between the forwarding core and the daemon:
//!
//! - [`MacAddress`]: 48-bit Ethernet MAC addresses
//! - [`VlanId`]: IEEE 802.1Q VLAN identifiers
//! - [`PortMode`]: access/trunk port classification

mod mac;
mod port;
mod vlan;

pub use mac::MacAddress;
pub use port::PortMode;
pub use vlan::VlanId;

/// Common error type for parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid MAC address format: {0}")]
    InvalidMacAddress(String),

    #[error("invalid VLAN ID: {0} (must be 0-4095)")]
    InvalidVlanId(u16),

    #[error("invalid port mode token: {0} (expected \"T\" or a VLAN number)")]
    InvalidPortMode(String),
}
