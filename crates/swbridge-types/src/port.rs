//! Port mode classification for switch ports.

use crate::{ParseError, VlanId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Forwarding mode of a switch port.
///
/// An access port carries untagged traffic for exactly one VLAN; a trunk
/// port carries tagged traffic for all VLANs. Modeling this as a sum type
/// means trunk ports simply have no VLAN field to misread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortMode {
    /// Access port carrying untagged traffic for a single VLAN.
    Access(VlanId),
    /// Trunk port carrying tagged traffic for all VLANs.
    Trunk,
}

impl PortMode {
    /// Returns true if this is a trunk port.
    pub const fn is_trunk(&self) -> bool {
        matches!(self, PortMode::Trunk)
    }

    /// Returns the access VLAN, or `None` for trunk ports.
    pub const fn access_vlan(&self) -> Option<VlanId> {
        match self {
            PortMode::Access(vlan) => Some(*vlan),
            PortMode::Trunk => None,
        }
    }
}

impl fmt::Display for PortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortMode::Access(vlan) => write!(f, "access vlan {}", vlan),
            PortMode::Trunk => write!(f, "trunk"),
        }
    }
}

impl FromStr for PortMode {
    type Err = ParseError;

    /// Parses the switch config token: a literal `T` marks a trunk port,
    /// any other token is the access VLAN number.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "T" {
            return Ok(PortMode::Trunk);
        }
        let vlan = s
            .parse::<VlanId>()
            .map_err(|_| ParseError::InvalidPortMode(s.to_string()))?;
        Ok(PortMode::Access(vlan))
    }
}
