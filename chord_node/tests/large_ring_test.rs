use chord_proto::chord::chord_server::Chord;
use chord_proto::chord::{GetRequest, PutRequest};
use std::time::Duration;
use tonic::Request;

mod common;
use common::{stabilize_ring, start_node};

#[tokio::test]
async fn test_large_chord_ring() {
    const NUM_NODES: usize = 20;
    const BASE_PORT: u16 = 60000;

    println!("Creating {} nodes...", NUM_NODES);
    let mut nodes = Vec::new();

    for i in 0..NUM_NODES {
        let addr = format!("127.0.0.1:{}", BASE_PORT + i as u16);
        let (node, _handle) = start_node(addr).await;
        println!("Node {}: {} ({})", i, node.id, node.addr);
        nodes.push(node);
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    println!("\nJoining nodes to ring...");
    for i in 1..NUM_NODES {
        nodes[i]
            .join(nodes[0].addr.clone())
            .await
            .unwrap_or_else(|_| panic!("Node {} failed to join", i));
        println!("Node {} joined", i);
        tokio::time::sleep(Duration::from_millis(100)).await;

        if i % 3 == 0 || i == NUM_NODES - 1 {
            println!("Stabilizing after {} nodes...", i + 1);
            stabilize_ring(&nodes[..=i], 5).await;
        }
    }

    println!("\nFinal stabilization of complete ring...");
    stabilize_ring(&nodes, 30).await;

    println!("\nVerifying ring structure...");
    let mut node_ids: Vec<_> = nodes.iter().map(|n| n.id).collect();
    node_ids.sort();

    let mut visited = std::collections::HashSet::new();
    let mut current_id = nodes[0].id;

    for _ in 0..NUM_NODES {
        visited.insert(current_id);
        let current_node = nodes.iter().find(|n| n.id == current_id).unwrap();
        let state = current_node.state.read().await;
        let successor = state.successor().clone();
        println!("Node {} -> {}", current_id, successor.id);
        current_id = successor.id;
    }

    assert_eq!(current_id, nodes[0].id, "Ring is not properly formed");
    assert_eq!(visited.len(), NUM_NODES, "Not all nodes are in the ring");
    println!("Ring structure is valid");

    println!("\nTesting Put/Get operations...");
    let test_cases = [
        ("key1", "value1"),
        ("key2", "value2"),
        ("key3", "value3"),
        ("hello", "world"),
        ("foo", "bar"),
        ("test", "data"),
        ("chord", "dht"),
        ("distributed", "hash_table"),
    ];

    for (i, (key, value)) in test_cases.iter().enumerate() {
        let put_node = &nodes[i % NUM_NODES];
        let put_req = Request::new(PutRequest {
            key: key.to_string(),
            value: value.to_string(),
        });
        put_node
            .put(put_req)
            .await
            .unwrap_or_else(|_| panic!("Put failed for key '{}'", key));
    }

    tokio::time::sleep(Duration::from_millis(200)).await;

    for (i, (key, expected_value)) in test_cases.iter().enumerate() {
        let get_node = &nodes[(i + NUM_NODES / 2) % NUM_NODES];
        let get_req = Request::new(GetRequest {
            key: key.to_string(),
        });

        let response = get_node
            .get(get_req)
            .await
            .unwrap_or_else(|_| panic!("Get failed for key '{}'", key));
        let resp = response.into_inner();

        assert!(resp.found, "Key '{}' not found", key);
        assert_eq!(
            resp.value, *expected_value,
            "Value mismatch for key '{}'",
            key
        );
    }

    println!("\nVerifying key distribution...");
    let mut total_keys = 0;
    for node in nodes.iter() {
        let state = node.state.read().await;
        total_keys += state.store.len();
    }

    assert_eq!(total_keys, test_cases.len(), "Total keys mismatch");
    println!("Total keys: {}", total_keys);
}
