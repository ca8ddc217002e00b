use chord_proto::chord::NodeInfo;
use chord_proto::ChordId;

/// A `(id, address)` value pair. Peers are copied freely and never mutated;
/// equality is by address, matching the protocol's peer-reference semantics.
#[derive(Debug, Clone)]
pub struct Peer {
    pub id: ChordId,
    pub address: String,
}

impl Peer {
    pub fn new(id: ChordId, address: String) -> Self {
        Peer { id, address }
    }

    pub fn dial_address(&self) -> String {
        format!("http://{}", self.address)
    }

    pub fn to_proto(&self) -> NodeInfo {
        NodeInfo {
            id: self.id.as_bytes().to_vec(),
            address: self.address.clone(),
        }
    }

    pub fn from_proto(info: NodeInfo) -> Option<Self> {
        let id = ChordId::from_bytes(&info.id)?;
        Some(Peer::new(id, info.address))
    }
}

impl PartialEq for Peer {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
    }
}

impl Eq for Peer {}

impl std::fmt::Display for Peer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.id, self.address)
    }
}
