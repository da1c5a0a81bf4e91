//! VLAN-aware forwarding engine.
//!
//! Given one received frame, the engine learns its source address, decides
//! the candidate egress ports (known unicast, flood, or broadcast) and
//! applies the access/trunk tagging policy per candidate.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BridgeError, Result};
use crate::fdb::{FdbTable, LearnOutcome};
use crate::frame::{self, EthernetHeader};
use crate::PortId;
use swbridge_types::{PortMode, VlanId};

/// Static configuration of one switch port. The port's [`PortId`] is its
/// index in the engine's port table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortProfile {
    pub name: String,
    pub mode: PortMode,
}

impl PortProfile {
    pub fn new(name: impl Into<String>, mode: PortMode) -> Self {
        Self {
            name: name.into(),
            mode,
        }
    }
}

/// One forwarding decision: emit `frame` on `port`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameAction {
    pub port: PortId,
    pub frame: Vec<u8>,
}

/// The forwarding engine owns the learning table and an immutable view of
/// the per-port configuration.
///
/// Processing is strictly one frame at a time; the daemon serializes access
/// through a mutex so that any second actor (the BPDU task today, an STP
/// machine later) observes a consistent table.
#[derive(Debug)]
pub struct ForwardingEngine {
    ports: Vec<PortProfile>,
    fdb: FdbTable,
}

impl ForwardingEngine {
    /// Creates an engine for the given port table. Built once at startup;
    /// the port configuration is immutable afterwards.
    pub fn new(ports: Vec<PortProfile>) -> Self {
        Self {
            ports,
            fdb: FdbTable::new(),
        }
    }

    /// The configured ports, indexed by [`PortId`].
    pub fn ports(&self) -> &[PortProfile] {
        &self.ports
    }

    /// Read access to the learning table.
    pub fn fdb(&self) -> &FdbTable {
        &self.fdb
    }

    fn profile(&self, port: PortId) -> Result<&PortProfile> {
        self.ports.get(port).ok_or(BridgeError::UnknownPort(port))
    }

    /// Processes one received frame and returns the forwarding actions.
    ///
    /// An empty result is normal (VLAN mismatch, or a known station on the
    /// ingress port itself). Errors mean the frame was dropped without any
    /// learning or forwarding side effects beyond those stated in
    /// [`BridgeError`].
    pub fn process(&mut self, ingress: PortId, data: &[u8]) -> Result<Vec<FrameAction>> {
        let header = frame::decode(data)?;

        // Validate the ingress port before mutating the table so a
        // misconfigured data plane cannot poison it.
        let src_mode = self.profile(ingress)?.mode;

        match self.fdb.learn(header.src, ingress) {
            LearnOutcome::New => {
                debug!(mac = %header.src, port = ingress, "learned station");
            }
            LearnOutcome::Moved { from } => {
                debug!(mac = %header.src, from, to = ingress, "station moved");
            }
            LearnOutcome::Refreshed | LearnOutcome::Skipped => {}
        }

        let candidates = self.candidate_ports(ingress, &header)?;

        let mut actions = Vec::with_capacity(candidates.len());
        for dst in candidates {
            let dst_mode = self.ports[dst].mode;
            if let Some(bytes) = Self::egress_frame(src_mode, header.vlan, dst_mode, data) {
                actions.push(FrameAction {
                    port: dst,
                    frame: bytes,
                });
            }
        }
        Ok(actions)
    }

    /// Candidate egress ports before VLAN policy: the learned port for a
    /// known unicast destination, everything but the ingress otherwise.
    fn candidate_ports(&self, ingress: PortId, header: &EthernetHeader) -> Result<Vec<PortId>> {
        if !header.dst.is_broadcast() {
            if let Some(dst) = self.fdb.lookup(&header.dst) {
                if dst == ingress {
                    // Station already reachable on the ingress segment.
                    return Ok(Vec::new());
                }
                self.profile(dst)?;
                return Ok(vec![dst]);
            }
        }
        Ok((0..self.ports.len()).filter(|&p| p != ingress).collect())
    }

    /// The 2x2 access/trunk policy. Returns the outbound frame bytes, or
    /// `None` to drop this candidate.
    fn egress_frame(
        src_mode: PortMode,
        frame_vlan: Option<VlanId>,
        dst_mode: PortMode,
        data: &[u8],
    ) -> Option<Vec<u8>> {
        match (src_mode, dst_mode) {
            (PortMode::Access(src_vlan), PortMode::Access(dst_vlan)) => {
                (src_vlan == dst_vlan).then(|| data.to_vec())
            }
            (PortMode::Access(src_vlan), PortMode::Trunk) => {
                Some(frame::insert_tag(data, src_vlan))
            }
            // An untagged frame from a trunk carries no VLAN and can never
            // match an access port's VLAN.
            (PortMode::Trunk, PortMode::Access(dst_vlan)) => {
                (frame_vlan == Some(dst_vlan)).then(|| frame::strip_tag(data))
            }
            (PortMode::Trunk, PortMode::Trunk) => Some(data.to_vec()),
        }
    }
}
