//! bridged - VLAN-aware software Ethernet switch daemon.
//!
//! Wires the forwarding core of `swbridge-core` to a data plane: frames
//! received on any port are run through the engine and the resulting
//! actions are emitted, one frame at a time in arrival order.

pub mod bpdu;
pub mod config;
pub mod error;
pub mod link;

pub use config::SwitchConfig;
pub use error::{BridgedError, Result};
pub use link::{ChannelHandle, ChannelLink, DataPlane, RxFrame, UnixDatagramLink};

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{info, trace, warn};

use swbridge_core::ForwardingEngine;

/// The receive/decide/send loop.
///
/// Per-frame errors (malformed frames, unknown ports) are logged and the
/// loop moves on; data-plane send failures are fatal. Returns `Ok(())`
/// when the data plane closes.
pub async fn run<D: DataPlane>(link: &mut D, engine: Arc<Mutex<ForwardingEngine>>) -> Result<()> {
    info!(
        ports = link.port_count(),
        mac = %link.switch_mac(),
        "switch loop running"
    );

    loop {
        let rx = match link.recv().await {
            Ok(rx) => rx,
            Err(BridgedError::LinkClosed) => {
                info!("data plane closed, stopping");
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let actions = {
            let mut engine = engine.lock();
            match engine.process(rx.port, &rx.data) {
                Ok(actions) => actions,
                Err(e) => {
                    warn!(port = rx.port, len = rx.data.len(), error = %e, "frame dropped");
                    continue;
                }
            }
        };

        for action in actions {
            trace!(
                from = link.port_name(rx.port),
                to = link.port_name(action.port),
                len = action.frame.len(),
                "forwarding"
            );
            link.send(action.port, &action.frame).await?;
        }
    }
}
