//! VLAN ID type with validation.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// IEEE 802.1Q VLAN identifier.
///
/// The identifier occupies the low 12 bits of the tag control information
/// field, so the representable range is 0-4095. The frame codec must be able
/// to round-trip the whole space, so no range is reserved here.
///
/// # Examples
///
/// ```
/// use swbridge_types::VlanId;
///
/// let vlan = VlanId::new(100).unwrap();
/// assert_eq!(vlan.as_u16(), 100);
///
/// assert!(VlanId::new(4096).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct VlanId(u16);

impl VlanId {
    /// Maximum representable VLAN ID (12 bits).
    pub const MAX: u16 = 0x0fff;

    /// Creates a new VLAN ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the value does not fit in 12 bits.
    pub const fn new(id: u16) -> Result<Self, ParseError> {
        if id <= Self::MAX {
            Ok(VlanId(id))
        } else {
            Err(ParseError::InvalidVlanId(id))
        }
    }

    /// Extracts the VLAN ID from a tag control information field,
    /// discarding the PCP/DEI bits.
    pub const fn from_tci(tci: u16) -> Self {
        VlanId(tci & Self::MAX)
    }

    /// Returns the VLAN ID as a u16.
    pub const fn as_u16(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for VlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for VlanId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id: u16 = s.parse().map_err(|_| ParseError::InvalidVlanId(0))?;
        VlanId::new(id)
    }
}

impl TryFrom<u16> for VlanId {
    type Error = ParseError;

    fn try_from(id: u16) -> Result<Self, Self::Error> {
        VlanId::new(id)
    }
}

impl From<VlanId> for u16 {
    fn from(vlan: VlanId) -> u16 {
        vlan.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_valid_vlan_ids() {
        assert!(VlanId::new(0).is_ok());
        assert!(VlanId::new(100).is_ok());
        assert!(VlanId::new(4095).is_ok());
    }

    #[test]
    fn test_invalid_vlan_ids() {
        assert!(VlanId::new(4096).is_err());
        assert!(VlanId::new(65535).is_err());
    }

    #[test]
    fn test_from_tci_masks_pcp_bits() {
        // PCP 7 + DEI set, VLAN 100
        let tci = 0xf000 | 100;
        assert_eq!(VlanId::from_tci(tci).as_u16(), 100);
    }

    #[test]
    fn test_parse() {
        let vlan: VlanId = "100".parse().unwrap();
        assert_eq!(vlan.as_u16(), 100);

        assert!("T".parse::<VlanId>().is_err());
        assert!("5000".parse::<VlanId>().is_err());
    }

    #[test]
    fn test_display() {
        let vlan = VlanId::new(100).unwrap();
        assert_eq!(vlan.to_string(), "100");
    }
}
