//! Outbound RPC helpers. Every call here is a single short-lived connection
//! (§4.D); callers never hold the state lock while awaiting one of these.

use crate::node::Node;
use crate::peer::Peer;
use chord_proto::chord::chord_client::ChordClient;
use chord_proto::chord::{
    Empty, FindSuccessorRequest, FindSuccessorReply, NodeInfo, PutRequest, PutResponse,
    GetRequest, GetResponse, SuccessorList, TransferKeysRequest,
};
use std::collections::HashMap;
use tonic::{transport::Channel, Request, Status};

pub type RpcResult<T> = Result<T, Status>;

impl Node {
    pub(crate) async fn connect_rpc(&self, address: &str) -> RpcResult<ChordClient<Channel>> {
        let endpoint = format!("http://{address}");
        ChordClient::connect(endpoint)
            .await
            .map_err(|e| Status::unavailable(format!("dialing {address}: {e}")))
    }

    pub(crate) async fn ping_rpc(&self, address: &str) -> RpcResult<()> {
        let mut client = self.connect_rpc(address).await?;
        client.ping(Request::new(Empty {})).await?;
        Ok(())
    }

    /// A single remote step of the lookup engine: ask `address` to answer
    /// `find_successor(id)` locally (§4.E).
    pub(crate) async fn find_successor_rpc(
        &self,
        address: &str,
        id: &chord_proto::ChordId,
    ) -> RpcResult<(Peer, bool)> {
        let mut client = self.connect_rpc(address).await?;
        let request = Request::new(FindSuccessorRequest {
            id: id.as_bytes().to_vec(),
        });
        let reply: FindSuccessorReply = client.find_successor(request).await?.into_inner();
        let peer_proto = reply
            .peer
            .ok_or_else(|| Status::internal("find_successor reply missing peer"))?;
        let peer = malformed_if_none(Peer::from_proto(peer_proto))?;
        Ok((peer, reply.found))
    }

    pub(crate) async fn get_predecessor_rpc(&self, address: &str) -> RpcResult<Option<Peer>> {
        let mut client = self.connect_rpc(address).await?;
        let reply = client.get_predecessor(Request::new(Empty {})).await?.into_inner();
        match reply.peer {
            Some(info) => Ok(Some(malformed_if_none(Peer::from_proto(info))?)),
            None => Ok(None),
        }
    }

    pub(crate) async fn get_successor_list_rpc(&self, address: &str) -> RpcResult<Vec<Peer>> {
        let mut client = self.connect_rpc(address).await?;
        let reply: SuccessorList = client
            .get_successor_list(Request::new(Empty {}))
            .await?
            .into_inner();
        reply
            .successors
            .into_iter()
            .map(|info| malformed_if_none(Peer::from_proto(info)))
            .collect()
    }

    pub(crate) async fn notify_rpc(&self, address: &str, candidate: &Peer) -> RpcResult<()> {
        let mut client = self.connect_rpc(address).await?;
        client
            .notify(Request::new(candidate.to_proto()))
            .await?;
        Ok(())
    }

    pub(crate) async fn get_id_rpc(&self, address: &str) -> RpcResult<Peer> {
        let mut client = self.connect_rpc(address).await?;
        let reply: NodeInfo = client.get_id(Request::new(Empty {})).await?.into_inner();
        malformed_if_none(Peer::from_proto(reply))
    }

    pub(crate) async fn put_rpc(
        &self,
        address: &str,
        key: String,
        value: String,
    ) -> RpcResult<PutResponse> {
        let mut client = self.connect_rpc(address).await?;
        let reply = client
            .put(Request::new(PutRequest { key, value }))
            .await?
            .into_inner();
        Ok(reply)
    }

    pub(crate) async fn get_rpc(&self, address: &str, key: String) -> RpcResult<GetResponse> {
        let mut client = self.connect_rpc(address).await?;
        let reply = client.get(Request::new(GetRequest { key })).await?.into_inner();
        Ok(reply)
    }

    pub(crate) async fn transfer_keys_rpc(
        &self,
        address: &str,
        keys: HashMap<String, String>,
    ) -> RpcResult<()> {
        let mut client = self.connect_rpc(address).await?;
        client
            .transfer_keys(Request::new(TransferKeysRequest { keys }))
            .await?;
        Ok(())
    }
}

fn malformed_if_none(peer: Option<Peer>) -> RpcResult<Peer> {
    peer.ok_or_else(|| Status::internal("malformed peer id in reply"))
}
