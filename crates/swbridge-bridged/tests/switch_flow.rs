//! End-to-end switch behavior over an in-memory data plane.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::timeout;

use swbridge_bridged::{run, ChannelLink, RxFrame, SwitchConfig};
use swbridge_core::{frame, ForwardingEngine};
use swbridge_types::{MacAddress, VlanId};

const SWITCH_MAC: MacAddress = MacAddress::new([0x02, 0x42, 0x53, 0x57, 0x00, 0x01]);
const HOST_A: [u8; 6] = [0x02, 0x00, 0x00, 0x00, 0x00, 0x0a];
const HOST_B: [u8; 6] = [0x02, 0x00, 0x00, 0x00, 0x00, 0x0b];
const HOST_C: [u8; 6] = [0x02, 0x00, 0x00, 0x00, 0x00, 0x0c];
const BROADCAST: [u8; 6] = [0xff; 6];

const CONFIG: &str = "1\nr-0 10\nr-1 10\nr-2 20\nrr-0-1 T\n";

fn untagged(dst: [u8; 6], src: [u8; 6]) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(&dst);
    data.extend_from_slice(&src);
    data.extend_from_slice(&0x0800u16.to_be_bytes());
    data.extend_from_slice(b"integration payload");
    data
}

async fn expect_frame(rx: &mut tokio::sync::mpsc::UnboundedReceiver<Vec<u8>>) -> Vec<u8> {
    timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("timed out waiting for egress frame")
        .expect("egress channel closed")
}

#[tokio::test]
async fn test_learning_flooding_and_tagging_end_to_end() {
    let config = SwitchConfig::parse(CONFIG).unwrap();
    let names = config.ports.iter().map(|p| p.name.clone()).collect();

    let (link, mut handle) = ChannelLink::new(names, SWITCH_MAC);
    let engine = Arc::new(Mutex::new(ForwardingEngine::new(config.ports)));

    let loop_task = tokio::spawn({
        let engine = engine.clone();
        async move {
            let mut link = link;
            run(&mut link, engine).await
        }
    });

    let vlan10 = VlanId::new(10).unwrap();
    let vlan20 = VlanId::new(20).unwrap();

    // A broadcasts from the first VLAN 10 access port: the frame floods to
    // the sibling access port unchanged and to the trunk with a tag, but
    // never crosses into VLAN 20.
    let hello = untagged(BROADCAST, HOST_A);
    handle
        .ingress
        .send(RxFrame {
            port: 0,
            data: hello.clone(),
        })
        .await
        .unwrap();

    assert_eq!(expect_frame(&mut handle.egress[1]).await, hello);
    assert_eq!(
        expect_frame(&mut handle.egress[3]).await,
        frame::insert_tag(&hello, vlan10)
    );
    // All sends for this frame are ordered, so by now port 2 would have
    // its copy if one existed.
    assert!(handle.egress[2].try_recv().is_err());

    // B replies to A: A was learned on port 0, so delivery is direct.
    let reply = untagged(HOST_A, HOST_B);
    handle
        .ingress
        .send(RxFrame {
            port: 1,
            data: reply.clone(),
        })
        .await
        .unwrap();

    assert_eq!(expect_frame(&mut handle.egress[0]).await, reply);
    assert!(handle.egress[3].try_recv().is_err());

    // A tagged VLAN 20 frame arrives on the trunk for an unknown station:
    // it floods, but only the VLAN 20 access port receives it, untagged.
    let remote = frame::insert_tag(&untagged(HOST_C, HOST_B), vlan20);
    handle
        .ingress
        .send(RxFrame {
            port: 3,
            data: remote.clone(),
        })
        .await
        .unwrap();

    assert_eq!(
        expect_frame(&mut handle.egress[2]).await,
        frame::strip_tag(&remote)
    );
    assert!(handle.egress[0].try_recv().is_err());
    assert!(handle.egress[1].try_recv().is_err());

    // The table now knows all three stations.
    assert_eq!(engine.lock().fdb().len(), 3);

    // Closing the ingress side shuts the loop down cleanly.
    drop(handle.ingress);
    let result = timeout(Duration::from_secs(1), loop_task)
        .await
        .expect("loop did not stop")
        .expect("loop task panicked");
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_malformed_frames_do_not_stop_the_loop() {
    let config = SwitchConfig::parse(CONFIG).unwrap();
    let names = config.ports.iter().map(|p| p.name.clone()).collect();

    let (link, mut handle) = ChannelLink::new(names, SWITCH_MAC);
    let engine = Arc::new(Mutex::new(ForwardingEngine::new(config.ports)));

    let loop_task = tokio::spawn({
        let engine = engine.clone();
        async move {
            let mut link = link;
            run(&mut link, engine).await
        }
    });

    // A runt frame is dropped without learning anything...
    handle
        .ingress
        .send(RxFrame {
            port: 0,
            data: vec![0u8; 5],
        })
        .await
        .unwrap();

    // ...and the next frame is still processed normally.
    let hello = untagged(BROADCAST, HOST_A);
    handle
        .ingress
        .send(RxFrame {
            port: 0,
            data: hello.clone(),
        })
        .await
        .unwrap();

    assert_eq!(expect_frame(&mut handle.egress[1]).await, hello);
    assert_eq!(engine.lock().fdb().len(), 1);

    drop(handle.ingress);
    let result = timeout(Duration::from_secs(1), loop_task)
        .await
        .expect("loop did not stop")
        .expect("loop task panicked");
    assert!(result.is_ok());
}
