//! Optional periodic state reporting to a `chord_monitor` instance.
//! Outside the Chord core proper (ambient observability, not part of §2-9);
//! failures are swallowed since a missing monitor must never affect ring
//! operation.

use crate::node::Node;
use chord_proto::chord::chord_monitor_client::ChordMonitorClient;
use chord_proto::chord::NodeState as ProtoNodeState;
use tonic::Request;

impl Node {
    pub async fn report_to_monitor(&self, monitor_addr: &str) {
        let snapshot = {
            let state = self.state.read().await;
            ProtoNodeState {
                id: self.id.as_bytes().to_vec(),
                address: self.addr.clone(),
                predecessor: state.predecessor.as_ref().map(crate::peer::Peer::to_proto),
                successors: state.successors.iter().map(crate::peer::Peer::to_proto).collect(),
                finger_table: state.finger_table.iter().map(crate::peer::Peer::to_proto).collect(),
                stored_keys: state.store.keys().cloned().collect(),
            }
        };

        let endpoint = format!("http://{monitor_addr}");
        if let Ok(mut client) = ChordMonitorClient::connect(endpoint).await {
            let _ = client.report_state(Request::new(snapshot)).await;
        }
    }
}
