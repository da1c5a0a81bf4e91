//! Per-switch configuration file.
//!
//! The format is one priority line followed by one line per port:
//!
//! ```text
//! 1
//! r-0 10
//! r-1 10
//! rr-0-1 T
//! ```
//!
//! The first character of the first line is the switch's STP priority
//! digit. Each following line is `<port_name> <"T"|vlan>`: a literal `T`
//! marks a trunk port, any other token is the access VLAN id. Port order in
//! the file defines the port numbering used by the engine and data plane.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{BridgedError, Result};
use swbridge_core::PortProfile;
use swbridge_types::PortMode;

/// Parsed switch configuration. Built once at startup, read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchConfig {
    /// STP priority digit from the first line. Parsed and carried for the
    /// future spanning-tree machine; the forwarding core does not use it.
    pub priority: u8,
    /// Ports in file order; the line index is the port id.
    pub ports: Vec<PortProfile>,
}

impl SwitchConfig {
    /// Conventional config path for a switch id.
    pub fn default_path(switch_id: u8) -> PathBuf {
        PathBuf::from(format!("configs/switch{}.cfg", switch_id))
    }

    /// Loads and parses the config file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            BridgedError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    /// Parses the config file contents.
    pub fn parse(content: &str) -> Result<Self> {
        let mut lines = content.lines();

        let first = lines
            .next()
            .ok_or_else(|| BridgedError::Config("empty switch config".to_string()))?;
        let priority = first
            .chars()
            .next()
            .filter(char::is_ascii_digit)
            .map(|c| c as u8 - b'0')
            .ok_or_else(|| {
                BridgedError::Config(format!(
                    "first line must start with a priority digit, got {:?}",
                    first
                ))
            })?;

        let mut ports = Vec::new();
        for (idx, line) in lines.enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            // Line numbers are 1-based and the priority line is line 1.
            let lineno = idx + 2;

            let mut fields = line.split_whitespace();
            let name = fields.next().ok_or_else(|| {
                BridgedError::Config(format!("line {}: missing port name", lineno))
            })?;
            let token = fields.next().ok_or_else(|| {
                BridgedError::Config(format!("line {}: missing port mode for {}", lineno, name))
            })?;
            let mode: PortMode = token
                .parse()
                .map_err(|e| BridgedError::Config(format!("line {}: {}", lineno, e)))?;

            ports.push(PortProfile::new(name, mode));
        }

        Ok(SwitchConfig { priority, ports })
    }
}
