//! The three independent periodic procedures (§4.G/H/I). Each follows the
//! §5 discipline: snapshot a field under a lock, release the lock, issue the
//! RPC with no lock held, then re-acquire and re-validate before committing.

use crate::constants::FINGER_TABLE_SIZE;
use crate::node::Node;
use crate::state::in_range_inclusive;
use log::{debug, warn};

impl Node {
    /// One stabilize tick (§4.G).
    pub async fn stabilize(&self) {
        let successor = { self.state.read().await.successor().clone() };

        match self.get_predecessor_rpc(&successor.address).await {
            Err(source) => {
                warn!(
                    "node {}: successor {} unreachable ({}), promoting next",
                    self.id, successor.address, source
                );
                let mut state = self.state.write().await;
                // Re-validate: only act if nothing else has already replaced
                // this successor since we snapshotted it.
                if state.successor().address == successor.address {
                    state.successors.remove(0);
                    let filler = state
                        .successors
                        .last()
                        .cloned()
                        .unwrap_or_else(|| self.self_peer());
                    state.successors.push(filler);
                    if state.successors.iter().all(|p| p.address == self.addr) {
                        state.successors = vec![self.self_peer(); self.r];
                    }
                }
                return;
            }
            Ok(x) => {
                let should_update = match &x {
                    Some(candidate) if candidate.address != self.addr => {
                        successor.address == self.addr
                            || in_range_inclusive(&candidate.id, &self.id, &successor.id)
                    }
                    _ => false,
                };

                if should_update {
                    let candidate = x.unwrap();
                    let mut state = self.state.write().await;
                    if state.successor().address == successor.address {
                        state.successors[0] = candidate;
                    }
                }
            }
        }

        let successor = { self.state.read().await.successor().clone() };

        match self.get_successor_list_rpc(&successor.address).await {
            Ok(reply) => {
                let mut new_successors = vec![successor.clone()];
                for peer in reply {
                    if new_successors.len() >= self.r {
                        break;
                    }
                    if peer.address == self.addr {
                        continue;
                    }
                    new_successors.push(peer);
                }
                while new_successors.len() < self.r {
                    let pad = new_successors
                        .last()
                        .cloned()
                        .unwrap_or_else(|| self.self_peer());
                    new_successors.push(pad);
                }

                let mut state = self.state.write().await;
                if state.successor().address == successor.address {
                    state.successors = new_successors;
                }
            }
            Err(e) => {
                debug!(
                    "node {}: failed to refresh successor list from {}: {}",
                    self.id, successor.address, e
                );
            }
        }

        if let Err(e) = self.notify_rpc(&successor.address, &self.self_peer()).await {
            warn!(
                "node {}: failed to notify successor {}: {}",
                self.id, successor.address, e
            );
        }
    }

    /// One finger-fixer tick (§4.H): rewrite exactly one entry, round-robin.
    pub async fn fix_fingers(&self) {
        let k = { self.state.read().await.next_finger };
        let target = self.id.jump(k);

        let resolved = self.find_successor(target).await.ok();

        let mut state = self.state.write().await;
        if let Some(successor) = resolved {
            state.set_finger(k, successor);
        }
        state.next_finger = if k >= FINGER_TABLE_SIZE { 1 } else { k + 1 };
    }

    /// One predecessor-check tick (§4.I).
    pub async fn check_predecessor(&self) {
        let predecessor = { self.state.read().await.predecessor.clone() };

        let Some(predecessor) = predecessor else {
            return;
        };

        if self.ping_rpc(&predecessor.address).await.is_err() {
            let mut state = self.state.write().await;
            // Only clear if a fresher notify hasn't already replaced it.
            if state
                .predecessor
                .as_ref()
                .is_some_and(|p| p.address == predecessor.address)
            {
                state.predecessor = None;
            }
        }
    }
}
