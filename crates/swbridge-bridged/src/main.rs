//! bridged - VLAN-aware software Ethernet switch daemon.
//!
//! Entry point: loads the per-switch config, binds the data plane and runs
//! the forwarding loop until the process is terminated.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use parking_lot::Mutex;
use tokio::signal;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use swbridge_bridged::{bpdu, run, SwitchConfig, UnixDatagramLink};
use swbridge_core::ForwardingEngine;
use swbridge_types::MacAddress;

#[derive(Parser, Debug)]
#[command(name = "bridged", about = "VLAN-aware software Ethernet switch")]
struct Args {
    /// Numeric switch id; selects the default config path and the switch MAC
    switch_id: u8,

    /// Switch config file (defaults to configs/switch<ID>.cfg)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the per-port datagram sockets
    #[arg(long, default_value = "/run/swbridge")]
    socket_dir: PathBuf,
}

/// Initializes tracing/logging subsystem
fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Stable locally-administered MAC for a switch id.
fn switch_mac(switch_id: u8) -> MacAddress {
    MacAddress::new([0x02, 0x42, 0x53, 0x57, 0x00, switch_id])
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let args = Args::parse();
    let config_path = args
        .config
        .unwrap_or_else(|| SwitchConfig::default_path(args.switch_id));

    let config = SwitchConfig::load(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    let mac = switch_mac(args.switch_id);
    info!(
        switch_id = args.switch_id,
        priority = config.priority,
        %mac,
        "starting bridged"
    );

    let mut link = UnixDatagramLink::bind(&config.ports, &args.socket_dir, mac)
        .context("binding data plane sockets")?;
    for (port, profile) in config.ports.iter().enumerate() {
        info!(port, name = %profile.name, mode = %profile.mode, "port attached");
    }

    let engine = Arc::new(Mutex::new(ForwardingEngine::new(config.ports)));
    let bpdu_task = bpdu::spawn(engine.clone(), config.priority);

    tokio::select! {
        result = run(&mut link, engine) => result.context("switch loop failed")?,
        _ = signal::ctrl_c() => info!("received shutdown signal"),
    }

    bpdu_task.abort();
    info!("bridged exiting");
    Ok(())
}
