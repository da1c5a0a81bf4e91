//! Periodic BPDU tick.
//!
//! Spanning tree is not implemented; this task only keeps the one-second
//! cadence the protocol would need and demonstrates the locking discipline
//! a second actor must follow around the shared engine.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::trace;

use swbridge_core::ForwardingEngine;

/// Spawns the one-second tick task. The returned handle can be aborted at
/// shutdown.
pub fn spawn(engine: Arc<Mutex<ForwardingEngine>>, priority: u8) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(Duration::from_secs(1));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            // TODO: build and emit configuration BPDUs here once the STP
            // state machine exists.
            let learned = engine.lock().fdb().len();
            trace!(priority, learned, "bpdu tick");
        }
    })
}
