//! MAC learning table (forwarding database).

use std::collections::HashMap;

use crate::PortId;
use swbridge_types::MacAddress;

/// Result of observing a source address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LearnOutcome {
    /// First observation of this address.
    New,
    /// The address was previously seen on another port.
    Moved { from: PortId },
    /// Same address, same port.
    Refreshed,
    /// The address is not learnable (broadcast source).
    Skipped,
}

/// Dynamic MAC learning table.
///
/// Maps each observed source address to the port it was last seen on,
/// last-write-wins. Entries never age out; the table only grows for the
/// lifetime of the switch (see DESIGN.md on aging).
#[derive(Debug, Default)]
pub struct FdbTable {
    entries: HashMap<MacAddress, PortId>,
}

impl FdbTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `mac` was observed as a source address on `port`,
    /// overwriting any previous observation.
    pub fn learn(&mut self, mac: MacAddress, port: PortId) -> LearnOutcome {
        if mac.is_broadcast() {
            return LearnOutcome::Skipped;
        }
        match self.entries.insert(mac, port) {
            None => LearnOutcome::New,
            Some(prev) if prev != port => LearnOutcome::Moved { from: prev },
            Some(_) => LearnOutcome::Refreshed,
        }
    }

    /// Returns the port `mac` was last seen on, if any.
    pub fn lookup(&self, mac: &MacAddress) -> Option<PortId> {
        self.entries.get(mac).copied()
    }

    /// Number of learned addresses.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been learned yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
