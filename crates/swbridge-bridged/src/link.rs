//! Data-plane boundary.
//!
//! The forwarding core is fed by whatever carries raw frames to and from
//! the switch ports. [`DataPlane`] is that boundary: a blocking receive of
//! `(port, bytes)` and a fire-and-forget send. [`UnixDatagramLink`] binds
//! the ports to Unix datagram sockets (one per port, frame per datagram);
//! [`ChannelLink`] is an in-memory implementation for tests.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::net::UnixDatagram;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::error::{BridgedError, Result};
use swbridge_core::{BridgeError, PortId, PortProfile};
use swbridge_types::MacAddress;

/// Largest frame a link will deliver (Ethernet MTU plus tagged header).
pub const MAX_FRAME_LEN: usize = 1518 + 4;

/// One received frame with its ingress port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RxFrame {
    pub port: PortId,
    pub data: Vec<u8>,
}

/// Abstract frame transport for the switch ports.
#[async_trait]
pub trait DataPlane: Send {
    /// Waits for the next frame on any port.
    async fn recv(&mut self) -> Result<RxFrame>;

    /// Emits a frame on one port. Fire-and-forget: no acknowledgment.
    async fn send(&self, port: PortId, frame: &[u8]) -> Result<()>;

    /// Number of attached ports.
    fn port_count(&self) -> usize;

    /// Human-readable name of a port.
    fn port_name(&self, port: PortId) -> &str;

    /// The switch's own hardware address.
    fn switch_mac(&self) -> MacAddress;
}

/// Data plane over per-port Unix datagram sockets.
///
/// For each configured port `p` a socket is bound at `<dir>/<p>.sock`;
/// frames sent by the switch go to `<dir>/<p>.peer.sock`, which the link
/// emulator on the other side binds. One reader task per port funnels
/// received frames into a single channel, preserving arrival order per
/// port.
pub struct UnixDatagramLink {
    mac: MacAddress,
    names: Vec<String>,
    rx: mpsc::Receiver<RxFrame>,
    sockets: Vec<Arc<UnixDatagram>>,
    peers: Vec<PathBuf>,
    readers: Vec<JoinHandle<()>>,
}

impl UnixDatagramLink {
    /// Binds a socket per port under `dir` and starts the reader tasks.
    pub fn bind(ports: &[PortProfile], dir: &Path, mac: MacAddress) -> Result<Self> {
        std::fs::create_dir_all(dir)?;

        let (tx, rx) = mpsc::channel(64);
        let mut names = Vec::with_capacity(ports.len());
        let mut sockets = Vec::with_capacity(ports.len());
        let mut peers = Vec::with_capacity(ports.len());
        let mut readers = Vec::with_capacity(ports.len());

        for (port, profile) in ports.iter().enumerate() {
            let path = dir.join(format!("{}.sock", profile.name));
            if path.exists() {
                std::fs::remove_file(&path)?;
            }
            let socket = Arc::new(UnixDatagram::bind(&path)?);

            names.push(profile.name.clone());
            peers.push(dir.join(format!("{}.peer.sock", profile.name)));
            readers.push(Self::spawn_reader(port, socket.clone(), tx.clone()));
            sockets.push(socket);
        }

        Ok(Self {
            mac,
            names,
            rx,
            sockets,
            peers,
            readers,
        })
    }

    fn spawn_reader(
        port: PortId,
        socket: Arc<UnixDatagram>,
        tx: mpsc::Sender<RxFrame>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut buf = vec![0u8; MAX_FRAME_LEN];
            loop {
                match socket.recv(&mut buf).await {
                    Ok(len) => {
                        let frame = RxFrame {
                            port,
                            data: buf[..len].to_vec(),
                        };
                        if tx.send(frame).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!(port, error = %e, "link receive failed");
                        break;
                    }
                }
            }
        })
    }
}

impl Drop for UnixDatagramLink {
    fn drop(&mut self) {
        for reader in &self.readers {
            reader.abort();
        }
    }
}

#[async_trait]
impl DataPlane for UnixDatagramLink {
    async fn recv(&mut self) -> Result<RxFrame> {
        self.rx.recv().await.ok_or(BridgedError::LinkClosed)
    }

    async fn send(&self, port: PortId, frame: &[u8]) -> Result<()> {
        let socket = self
            .sockets
            .get(port)
            .ok_or(BridgeError::UnknownPort(port))?;
        socket.send_to(frame, &self.peers[port]).await?;
        Ok(())
    }

    fn port_count(&self) -> usize {
        self.names.len()
    }

    fn port_name(&self, port: PortId) -> &str {
        &self.names[port]
    }

    fn switch_mac(&self) -> MacAddress {
        self.mac
    }
}

/// In-memory data plane for tests: frames are injected and collected
/// through channels held by a [`ChannelHandle`].
pub struct ChannelLink {
    mac: MacAddress,
    names: Vec<String>,
    rx: mpsc::Receiver<RxFrame>,
    egress: Vec<mpsc::UnboundedSender<Vec<u8>>>,
}

/// Test-side handle for a [`ChannelLink`]: inject ingress frames, collect
/// egress frames per port. Dropping the handle closes the link.
pub struct ChannelHandle {
    pub ingress: mpsc::Sender<RxFrame>,
    pub egress: Vec<mpsc::UnboundedReceiver<Vec<u8>>>,
}

impl ChannelLink {
    pub fn new(names: Vec<String>, mac: MacAddress) -> (Self, ChannelHandle) {
        let (ingress_tx, ingress_rx) = mpsc::channel(64);
        let mut egress_tx = Vec::with_capacity(names.len());
        let mut egress_rx = Vec::with_capacity(names.len());
        for _ in &names {
            let (tx, rx) = mpsc::unbounded_channel();
            egress_tx.push(tx);
            egress_rx.push(rx);
        }

        let link = Self {
            mac,
            names,
            rx: ingress_rx,
            egress: egress_tx,
        };
        let handle = ChannelHandle {
            ingress: ingress_tx,
            egress: egress_rx,
        };
        (link, handle)
    }
}

#[async_trait]
impl DataPlane for ChannelLink {
    async fn recv(&mut self) -> Result<RxFrame> {
        self.rx.recv().await.ok_or(BridgedError::LinkClosed)
    }

    async fn send(&self, port: PortId, frame: &[u8]) -> Result<()> {
        let tx = self
            .egress
            .get(port)
            .ok_or(BridgeError::UnknownPort(port))?;
        // Fire-and-forget: a dropped collector is not an error.
        let _ = tx.send(frame.to_vec());
        Ok(())
    }

    fn port_count(&self) -> usize {
        self.names.len()
    }

    fn port_name(&self, port: PortId) -> &str {
        &self.names[port]
    }

    fn switch_mac(&self) -> MacAddress {
        self.mac
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use swbridge_types::PortMode;
    use tokio::time::timeout;

    const MAC: MacAddress = MacAddress::new([0x02, 0x42, 0x53, 0x57, 0x00, 0x01]);

    #[tokio::test]
    async fn test_channel_link_round_trip() {
        let (mut link, mut handle) =
            ChannelLink::new(vec!["r-0".to_string(), "r-1".to_string()], MAC);

        assert_eq!(link.port_count(), 2);
        assert_eq!(link.port_name(1), "r-1");
        assert_eq!(link.switch_mac(), MAC);

        handle
            .ingress
            .send(RxFrame {
                port: 0,
                data: vec![1, 2, 3],
            })
            .await
            .unwrap();
        let rx = link.recv().await.unwrap();
        assert_eq!(rx.port, 0);
        assert_eq!(rx.data, vec![1, 2, 3]);

        link.send(1, &[4, 5, 6]).await.unwrap();
        assert_eq!(handle.egress[1].recv().await.unwrap(), vec![4, 5, 6]);
    }

    #[tokio::test]
    async fn test_channel_link_closed() {
        let (mut link, handle) = ChannelLink::new(vec!["r-0".to_string()], MAC);
        drop(handle);

        assert!(matches!(link.recv().await, Err(BridgedError::LinkClosed)));
    }

    #[tokio::test]
    async fn test_channel_link_unknown_port() {
        let (link, _handle) = ChannelLink::new(vec!["r-0".to_string()], MAC);
        assert!(link.send(5, &[0]).await.is_err());
    }

    #[tokio::test]
    async fn test_unix_datagram_link_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let ports = vec![PortProfile::new("r-0", PortMode::Trunk)];

        let mut link = UnixDatagramLink::bind(&ports, dir.path(), MAC).unwrap();

        // The emulator side binds the peer path.
        let peer = UnixDatagram::bind(dir.path().join("r-0.peer.sock")).unwrap();

        peer.send_to(&[0xaa, 0xbb], dir.path().join("r-0.sock"))
            .await
            .unwrap();
        let rx = timeout(Duration::from_secs(1), link.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(rx.port, 0);
        assert_eq!(rx.data, vec![0xaa, 0xbb]);

        link.send(0, &[0xcc]).await.unwrap();
        let mut buf = [0u8; 16];
        let len = timeout(Duration::from_secs(1), peer.recv(&mut buf))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(&buf[..len], &[0xcc]);
    }
}
