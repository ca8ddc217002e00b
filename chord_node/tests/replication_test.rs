use chord_proto::chord::chord_client::ChordClient;
use chord_proto::chord::PutRequest;
use std::time::Duration;
use tonic::Request;

mod common;
use common::{stabilize_ring, start_node};

/// A stored value lives only at its owner; there is no active fan-out to
/// the rest of the successor list. A hard crash (no graceful leave) loses
/// whatever the crashed node held — only a voluntary `leave` hands values
/// off (covered by `key_transfer_test`). This test pins that boundary down.
#[tokio::test]
async fn test_crash_without_leave_loses_unreplicated_key() {
    const BASE_PORT: u16 = 62000;
    const NUM_NODES: usize = 3;

    println!("Creating {} nodes...", NUM_NODES);
    let mut nodes = Vec::new();
    let mut handles = Vec::new();

    for i in 0..NUM_NODES {
        let addr = format!("127.0.0.1:{}", BASE_PORT + i as u16);
        let (node, handle) = start_node(addr).await;
        println!("Node {}: {} ({})", i, node.id, node.addr);
        nodes.push(node);
        handles.push(handle);
    }

    for (i, node) in nodes.iter().enumerate().skip(1) {
        node.join(nodes[0].addr.clone())
            .await
            .unwrap_or_else(|_| panic!("Node {} failed to join", i));
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    stabilize_ring(&nodes, 10).await;

    let key = "unreplicated_key";
    let value = "value";

    let client_addr = format!("http://{}", nodes[0].addr);
    let mut client = ChordClient::connect(client_addr)
        .await
        .expect("Failed to connect to Node 0");

    client
        .put(Request::new(PutRequest {
            key: key.to_string(),
            value: value.to_string(),
        }))
        .await
        .expect("Put failed");

    tokio::time::sleep(Duration::from_millis(200)).await;

    let mut owner_idx = None;
    for (i, node) in nodes.iter().enumerate() {
        if node.state.read().await.store.contains_key(key) {
            owner_idx = Some(i);
            break;
        }
    }
    let owner_idx = owner_idx.expect("exactly one node should own the key after put");

    println!("Simulating crash of owner (Node {}), no graceful leave...", owner_idx);
    handles[owner_idx].abort();

    let survivors: Vec<_> = nodes
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != owner_idx)
        .map(|(_, n)| n.clone())
        .collect();
    stabilize_ring(&survivors, 10).await;

    for node in &survivors {
        let state = node.state.read().await;
        assert!(
            !state.store.contains_key(key),
            "surviving node unexpectedly has the key — replication semantics changed?"
        );
    }
}
