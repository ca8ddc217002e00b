use crate::peer::Peer;
use chord_proto::ChordId;
use std::collections::HashMap;

/// The node's shared mutable state: predecessor, successor list, finger
/// table, finger-fixer cursor, and the key/value store. Guarded by a single
/// reader/writer lock (see `Node::state` in `node.rs`) — outbound RPCs must
/// never be issued while holding it.
#[derive(Debug)]
pub struct NodeState {
    pub predecessor: Option<Peer>,
    pub successors: Vec<Peer>,
    pub finger_table: Vec<Peer>,
    pub next_finger: u32,
    pub store: HashMap<String, String>,
}

impl NodeState {
    /// An unpopulated state: no predecessor, no successors, default fingers.
    /// `Node::create`/`Node::join` populate `successors`/`finger_table`.
    pub fn empty() -> Self {
        NodeState {
            predecessor: None,
            successors: Vec::new(),
            finger_table: Vec::new(),
            next_finger: 1,
            store: HashMap::new(),
        }
    }

    /// Singleton-ring state: every successor slot and every finger is `self`.
    pub fn singleton(self_peer: &Peer, r: usize) -> Self {
        NodeState {
            predecessor: None,
            successors: vec![self_peer.clone(); r],
            finger_table: vec![self_peer.clone(); crate::constants::FINGER_TABLE_SIZE as usize],
            next_finger: 1,
            store: HashMap::new(),
        }
    }

    pub fn successor(&self) -> &Peer {
        self.successors.first().expect("successor list is never empty")
    }

    /// Finger table entry for index `k` in `1..=160`.
    pub fn finger(&self, k: u32) -> &Peer {
        &self.finger_table[(k - 1) as usize]
    }

    pub fn set_finger(&mut self, k: u32, peer: Peer) {
        self.finger_table[(k - 1) as usize] = peer;
    }
}

/// Right-inclusive arc test `(a, b]`, the policy used throughout the
/// successor-ownership checks in this module (§4.A of the design).
pub fn in_range_inclusive(x: &ChordId, a: &ChordId, b: &ChordId) -> bool {
    chord_proto::id::in_between(x, a, b, true)
}

/// Open arc test `(a, b)`, used for closest-preceding-node scans and
/// predecessor-candidate checks.
pub fn in_range_exclusive(x: &ChordId, a: &ChordId, b: &ChordId) -> bool {
    chord_proto::id::in_between(x, a, b, false)
}
