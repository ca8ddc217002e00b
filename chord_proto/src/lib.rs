pub mod chord {
    tonic::include_proto!("chord");
}

pub mod id;

pub use id::ChordId;

/// Hash an arbitrary byte string (usually a peer's "host:port") into a
/// 160-bit Chord id.
pub fn hash_bytes(bytes: &[u8]) -> ChordId {
    ChordId::hash(bytes)
}

/// Convenience wrapper over [`hash_bytes`] for string keys.
pub fn hash_addr(addr: &str) -> ChordId {
    hash_bytes(addr.as_bytes())
}
