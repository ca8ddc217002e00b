//! The lookup engine (§4.E): iterative successor resolution, finger-table
//! acceleration, and the per-node local answer that both RPC handlers and
//! the iterative loop itself call into.

use crate::constants::{FINGER_TABLE_SIZE, LOOKUP_STEP_BOUND};
use crate::error::{ChordError, ChordResult};
use crate::node::Node;
use crate::peer::Peer;
use crate::state::{in_range_exclusive, in_range_inclusive, NodeState};
use chord_proto::ChordId;

impl Node {
    /// The public DHT primitive: resolve `id` to its owning peer by walking
    /// the ring outward from `self`, one hop at a time.
    pub async fn find_successor(&self, id: ChordId) -> ChordResult<Peer> {
        let mut current = self.self_peer();

        for _ in 0..LOOKUP_STEP_BOUND {
            let (peer, found) = if current.address == self.addr {
                self.answer_find_successor(&id).await
            } else {
                self.find_successor_rpc(&current.address, &id)
                    .await
                    .map_err(|source| ChordError::Transport {
                        address: current.address.clone(),
                        source,
                    })?
            };

            if found {
                return Ok(peer);
            }
            if peer.address == current.address {
                // Fixed point: the ring has collapsed onto this peer.
                return Ok(peer);
            }
            current = peer;
        }

        Err(ChordError::LookupStepBoundExceeded {
            id: id.to_string(),
            bound: LOOKUP_STEP_BOUND,
        })
    }

    /// One node's local answer to `findSuccessor(id)` (§4.E points 1-2):
    /// either the definitive successor, or a closer peer to continue at.
    pub(crate) async fn answer_find_successor(&self, id: &ChordId) -> (Peer, bool) {
        let state = self.state.read().await;
        let successor = state.successor().clone();

        if in_range_inclusive(id, &self.id, &successor.id) {
            return (successor, true);
        }

        let closest = closest_preceding_node(&state, &self.id, id);
        (closest, false)
    }
}

/// Scans the finger table from entry 160 down to 1 for the first entry
/// strictly inside `(self_id, id)`; falls back to `successors[0]` if none
/// qualifies (§4.E).
fn closest_preceding_node(state: &NodeState, self_id: &ChordId, id: &ChordId) -> Peer {
    for k in (1..=FINGER_TABLE_SIZE).rev() {
        let finger = state.finger(k);
        if in_range_exclusive(&finger.id, self_id, id) {
            return finger.clone();
        }
    }
    state.successor().clone()
}
