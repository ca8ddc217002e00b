use crate::peer::Peer;
use crate::state::NodeState;
use chord_proto::ChordId;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A Chord ring participant. `id`/`addr`/`r` are immutable after
/// construction; everything mutable lives behind `state`'s rw-lock
/// (§5: a single reader/writer lock guards the whole state object).
#[derive(Debug, Clone)]
pub struct Node {
    pub id: ChordId,
    pub addr: String,
    pub r: usize,
    pub state: Arc<RwLock<NodeState>>,
}

impl Node {
    /// Raw construction, unpopulated: no predecessor, empty successor list,
    /// empty finger table. Callers must follow up with [`Node::create`] or
    /// [`Node::join`] before the node participates in the ring (§4.B/§4.C).
    pub fn new(addr: String, r: usize, override_id: Option<ChordId>) -> Self {
        let id = override_id.unwrap_or_else(|| chord_proto::hash_addr(&addr));
        Node {
            id,
            addr,
            r,
            state: Arc::new(RwLock::new(NodeState::empty())),
        }
    }

    pub fn self_peer(&self) -> Peer {
        Peer::new(self.id, self.addr.clone())
    }

    /// Form a singleton ring: every successor slot and finger points to
    /// `self`, no predecessor (§8 scenario 1).
    pub fn create(addr: String, r: usize, override_id: Option<ChordId>) -> Self {
        let id = override_id.unwrap_or_else(|| chord_proto::hash_addr(&addr));
        let self_peer = Peer::new(id, addr.clone());
        Node {
            id,
            addr,
            r,
            state: Arc::new(RwLock::new(NodeState::singleton(&self_peer, r))),
        }
    }
}
