//! The join procedure (§4.F): obtain a first successor and an initial
//! successor list from a bootstrap peer.

use crate::constants::{FINGER_TABLE_SIZE, LOOKUP_STEP_BOUND};
use crate::error::{ChordError, ChordResult};
use crate::node::Node;
use crate::peer::Peer;

impl Node {
    /// Join an existing ring via `bootstrap_addr`. Fatal if the bootstrap
    /// peer cannot be reached at all (§4.F, §7).
    pub async fn join(&self, bootstrap_addr: String) -> ChordResult<()> {
        let successor = self.resolve_via_bootstrap(bootstrap_addr).await?;

        {
            let mut state = self.state.write().await;
            state.finger_table = vec![successor.clone(); FINGER_TABLE_SIZE as usize];
            state.successors = vec![successor.clone(); self.r];
            state.next_finger = 1;
            state.predecessor = None;
        }

        if let Ok(reply_successors) = self.get_successor_list_rpc(&successor.address).await {
            let mut new_successors = vec![successor.clone()];
            for peer in reply_successors {
                if new_successors.len() >= self.r {
                    break;
                }
                if peer.address == self.addr {
                    continue;
                }
                new_successors.push(peer);
            }
            while new_successors.len() < self.r {
                let pad = new_successors.last().cloned().unwrap_or_else(|| successor.clone());
                new_successors.push(pad);
            }

            let mut state = self.state.write().await;
            state.successors = new_successors;
        }
        // On failure the successors list stays padded with `successor` alone,
        // set above — the next stabilize tick will refresh it.

        Ok(())
    }

    /// Step 1 of §4.F: repeatedly issue `findSuccessor(self.id)` starting
    /// at the bootstrap peer (not `self`) until a definitive successor is
    /// obtained.
    async fn resolve_via_bootstrap(&self, bootstrap_addr: String) -> ChordResult<Peer> {
        let mut current_addr = bootstrap_addr.clone();
        let mut first_hop = true;

        for _ in 0..LOOKUP_STEP_BOUND {
            let result = self.find_successor_rpc(&current_addr, &self.id).await;
            let (peer, found) = match result {
                Ok(v) => v,
                Err(source) => {
                    return Err(if first_hop {
                        ChordError::BootstrapUnreachable {
                            address: bootstrap_addr,
                            source,
                        }
                    } else {
                        ChordError::Transport {
                            address: current_addr,
                            source,
                        }
                    });
                }
            };
            first_hop = false;

            if found || peer.address == current_addr {
                return Ok(peer);
            }
            current_addr = peer.address.clone();
        }

        Err(ChordError::LookupStepBoundExceeded {
            id: self.id.to_string(),
            bound: LOOKUP_STEP_BOUND,
        })
    }
}
