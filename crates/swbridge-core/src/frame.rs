//! Ethernet/802.1Q frame codec.
//!
//! Parses the fixed part of an Ethernet header and inserts or removes a
//! single 802.1Q tag. A frame is either untagged (14-byte header) or singly
//! tagged (18-byte header); double tagging is not modeled.

use byteorder::{BigEndian, ByteOrder};

use crate::error::{BridgeError, Result};
use swbridge_types::{MacAddress, VlanId};

/// Tag protocol identifier used on the emulated links. Real 802.1Q uses
/// 0x8100, which host kernels strip before a userspace switch ever sees it,
/// so the data plane carries the tag under this value instead.
pub const VLAN_TPID: u16 = 0x8200;

/// Header length of an untagged frame.
pub const UNTAGGED_HEADER_LEN: usize = 14;

/// Header length of a singly 802.1Q-tagged frame.
pub const TAGGED_HEADER_LEN: usize = 18;

/// Length of the 802.1Q tag itself.
pub const VLAN_TAG_LEN: usize = 4;

/// Decoded Ethernet header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EthernetHeader {
    pub dst: MacAddress,
    pub src: MacAddress,
    /// The true EtherType, read past the tag when one is present.
    pub ethertype: u16,
    /// VLAN ID from the 802.1Q tag, or `None` for untagged frames.
    pub vlan: Option<VlanId>,
}

fn mac_at(data: &[u8], offset: usize) -> MacAddress {
    let mut bytes = [0u8; 6];
    bytes.copy_from_slice(&data[offset..offset + 6]);
    MacAddress::new(bytes)
}

/// Decodes the Ethernet header of `data`.
///
/// # Errors
///
/// Returns [`BridgeError::FrameTooShort`] if the frame cannot hold the
/// header it claims to have (14 bytes untagged, 18 bytes tagged).
pub fn decode(data: &[u8]) -> Result<EthernetHeader> {
    if data.len() < UNTAGGED_HEADER_LEN {
        return Err(BridgeError::FrameTooShort {
            len: data.len(),
            need: UNTAGGED_HEADER_LEN,
        });
    }

    let dst = mac_at(data, 0);
    let src = mac_at(data, 6);

    // The field at offset 12 is either the EtherType or, for tagged
    // frames, the tag protocol identifier.
    let tpid_or_ethertype = BigEndian::read_u16(&data[12..14]);

    if tpid_or_ethertype == VLAN_TPID {
        if data.len() < TAGGED_HEADER_LEN {
            return Err(BridgeError::FrameTooShort {
                len: data.len(),
                need: TAGGED_HEADER_LEN,
            });
        }
        let tci = BigEndian::read_u16(&data[14..16]);
        let ethertype = BigEndian::read_u16(&data[16..18]);
        Ok(EthernetHeader {
            dst,
            src,
            ethertype,
            vlan: Some(VlanId::from_tci(tci)),
        })
    } else {
        Ok(EthernetHeader {
            dst,
            src,
            ethertype: tpid_or_ethertype,
            vlan: None,
        })
    }
}

/// Builds the 4-byte 802.1Q tag for `vlan`. PCP and DEI bits are always
/// zero; this switch does not model 802.1p priority.
pub fn encode_tag(vlan: VlanId) -> [u8; 4] {
    let mut tag = [0u8; 4];
    BigEndian::write_u16(&mut tag[0..2], VLAN_TPID);
    BigEndian::write_u16(&mut tag[2..4], vlan.as_u16());
    tag
}

/// Returns a copy of `data` with an 802.1Q tag for `vlan` inserted after
/// the source MAC. The result is 4 bytes longer than the input.
pub fn insert_tag(data: &[u8], vlan: VlanId) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() + VLAN_TAG_LEN);
    out.extend_from_slice(&data[..12]);
    out.extend_from_slice(&encode_tag(vlan));
    out.extend_from_slice(&data[12..]);
    out
}

/// Returns a copy of `data` with the 802.1Q tag at offset 12 removed. The
/// result is 4 bytes shorter than the input.
///
/// The caller must have established that the frame is tagged; the
/// forwarding engine only calls this after [`decode`] reported a VLAN.
pub fn strip_tag(data: &[u8]) -> Vec<u8> {
    debug_assert!(data.len() >= TAGGED_HEADER_LEN);
    let mut out = Vec::with_capacity(data.len() - VLAN_TAG_LEN);
    out.extend_from_slice(&data[..12]);
    out.extend_from_slice(&data[16..]);
    out
}
