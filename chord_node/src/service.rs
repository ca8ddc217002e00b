//! The inbound face of the RPC transport (§4.D): answers every method in the
//! table by reading or writing `Node::state` and delegating to the engine
//! modules (`lookup`, `storage`). No handler here issues an outbound RPC
//! itself, except `notify`'s background key-transfer spawn.

use crate::node::Node;
use crate::peer::Peer;
use chord_proto::chord::chord_server::Chord;
use chord_proto::chord::{
    Empty, FindSuccessorReply, FindSuccessorRequest, GetRequest, GetResponse, NodeInfo,
    OptionalNodeInfo, PutRequest, PutResponse, SuccessorList, TransferKeysRequest,
};
use tonic::{Request, Response, Status};

fn bad_id(e: impl std::fmt::Display) -> Status {
    Status::invalid_argument(format!("malformed id: {e}"))
}

#[tonic::async_trait]
impl Chord for Node {
    async fn ping(&self, _request: Request<Empty>) -> Result<Response<Empty>, Status> {
        Ok(Response::new(Empty {}))
    }

    async fn get_id(&self, _request: Request<Empty>) -> Result<Response<NodeInfo>, Status> {
        Ok(Response::new(self.self_peer().to_proto()))
    }

    async fn find_successor(
        &self,
        request: Request<FindSuccessorRequest>,
    ) -> Result<Response<FindSuccessorReply>, Status> {
        let req = request.into_inner();
        let id = chord_proto::ChordId::from_bytes(&req.id)
            .ok_or_else(|| bad_id("find_successor id must be 20 bytes"))?;

        let (peer, found) = self.answer_find_successor(&id).await;
        Ok(Response::new(FindSuccessorReply {
            peer: Some(peer.to_proto()),
            found,
        }))
    }

    async fn get_predecessor(
        &self,
        _request: Request<Empty>,
    ) -> Result<Response<OptionalNodeInfo>, Status> {
        let state = self.state.read().await;
        Ok(Response::new(OptionalNodeInfo {
            peer: state.predecessor.as_ref().map(Peer::to_proto),
        }))
    }

    async fn get_successor_list(
        &self,
        _request: Request<Empty>,
    ) -> Result<Response<SuccessorList>, Status> {
        let state = self.state.read().await;
        Ok(Response::new(SuccessorList {
            successors: state.successors.iter().map(Peer::to_proto).collect(),
        }))
    }

    async fn notify(&self, request: Request<NodeInfo>) -> Result<Response<Empty>, Status> {
        let info = request.into_inner();
        let candidate = Peer::from_proto(info).ok_or_else(|| bad_id("notify candidate"))?;
        self.handle_notify(candidate).await;
        Ok(Response::new(Empty {}))
    }

    async fn put(&self, request: Request<PutRequest>) -> Result<Response<PutResponse>, Status> {
        let req = request.into_inner();
        let success = self.put(req.key, req.value).await?;
        Ok(Response::new(PutResponse { success }))
    }

    async fn get(&self, request: Request<GetRequest>) -> Result<Response<GetResponse>, Status> {
        let req = request.into_inner();
        let (value, found) = self.get(req.key).await?;
        Ok(Response::new(GetResponse { value, found }))
    }

    async fn transfer_keys(
        &self,
        request: Request<TransferKeysRequest>,
    ) -> Result<Response<Empty>, Status> {
        let req = request.into_inner();
        self.receive_transferred_keys(req.keys).await;
        Ok(Response::new(Empty {}))
    }

    async fn leave(&self, _request: Request<Empty>) -> Result<Response<Empty>, Status> {
        self.leave_network().await;

        let delay = std::time::Duration::from_millis(crate::constants::LEAVE_EXIT_DELAY_MS);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            std::process::exit(0);
        });

        Ok(Response::new(Empty {}))
    }
}
