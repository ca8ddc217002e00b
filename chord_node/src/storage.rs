//! Key/value storage on top of the ring (supplemented feature, see
//! SPEC_FULL.md): `put`/`get` route to the key's owner via the lookup
//! engine; `notify` transfers keys to a newly-accepted predecessor; `leave`
//! transfers the whole store to the immediate successor before exiting.

use crate::error::{ChordError, ChordResult};
use crate::node::Node;
use crate::peer::Peer;
use crate::state::in_range_inclusive;
use log::warn;
use std::collections::HashMap;

impl Node {
    pub async fn put(&self, key: String, value: String) -> ChordResult<bool> {
        let key_id = chord_proto::hash_addr(&key);
        let owner = self.find_successor(key_id).await?;

        if owner.address == self.addr {
            let mut state = self.state.write().await;
            state.store.insert(key, value);
            Ok(true)
        } else {
            let reply = self
                .put_rpc(&owner.address, key, value)
                .await
                .map_err(|source| ChordError::Transport {
                    address: owner.address.clone(),
                    source,
                })?;
            Ok(reply.success)
        }
    }

    pub async fn get(&self, key: String) -> ChordResult<(String, bool)> {
        let key_id = chord_proto::hash_addr(&key);
        let owner = self.find_successor(key_id).await?;

        if owner.address == self.addr {
            let state = self.state.read().await;
            match state.store.get(&key) {
                Some(value) => Ok((value.clone(), true)),
                None => Ok((String::new(), false)),
            }
        } else {
            let reply = self
                .get_rpc(&owner.address, key)
                .await
                .map_err(|source| ChordError::Transport {
                    address: owner.address.clone(),
                    source,
                })?;
            Ok((reply.value, reply.found))
        }
    }

    /// Incoming `notify(candidate)` (§4.G incoming). Also transfers keys the
    /// local node no longer owns to the new predecessor, in the background.
    pub async fn handle_notify(&self, candidate: Peer) {
        if candidate.address == self.addr {
            return;
        }

        let mut state = self.state.write().await;
        let should_update = match &state.predecessor {
            None => true,
            Some(pred) => in_range_inclusive(&candidate.id, &pred.id, &self.id),
        };

        if !should_update {
            return;
        }

        state.predecessor = Some(candidate.clone());

        let mut keys_to_transfer = HashMap::new();
        let mut keys_to_remove = Vec::new();
        for (k, v) in state.store.iter() {
            let key_id = chord_proto::hash_addr(k);
            // Keys we still own live in (candidate.id, self.id]; anything
            // else now belongs to the new predecessor (or beyond it).
            if !in_range_inclusive(&key_id, &candidate.id, &self.id) {
                keys_to_transfer.insert(k.clone(), v.clone());
                keys_to_remove.push(k.clone());
            }
        }
        for k in &keys_to_remove {
            state.store.remove(k);
        }
        drop(state);

        if keys_to_transfer.is_empty() {
            return;
        }

        let node = self.clone();
        let target = candidate.address.clone();
        tokio::spawn(async move {
            if let Err(e) = node.transfer_keys_rpc(&target, keys_to_transfer).await {
                warn!("node {}: failed to transfer keys to new predecessor {}: {}", node.id, target, e);
            }
        });
    }

    /// Graceful departure: hand the whole store to the immediate successor.
    /// Membership recovery itself still relies on stabilization timing out
    /// (§1 Non-goals) — this only saves values that would otherwise be
    /// orphaned until a later `notify`-driven transfer occurs.
    pub async fn leave_network(&self) {
        let (successor, store) = {
            let state = self.state.read().await;
            (state.successor().clone(), state.store.clone())
        };

        if successor.address == self.addr || store.is_empty() {
            return;
        }

        if let Err(e) = self.transfer_keys_rpc(&successor.address, store).await {
            warn!(
                "node {}: failed to transfer keys to successor {} on leave: {}",
                self.id, successor.address, e
            );
        }
    }

    pub async fn receive_transferred_keys(&self, keys: HashMap<String, String>) {
        let mut state = self.state.write().await;
        state.store.extend(keys);
    }
}
