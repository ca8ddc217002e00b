//! Aggregates periodic state reports from running chord_node instances.
//! Pure observability sink: the distilled ring protocol has no dependency
//! on this crate, and no node blocks on it being reachable.

use chord_proto::chord::{
    chord_monitor_server::{ChordMonitor, ChordMonitorServer},
    Empty, NodeState,
};
use clap::Parser;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Mutex;
use tonic::{transport::Server, Request, Response, Status};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Local bind address for the monitor's gRPC sink.
    #[arg(short = 'a', long = "address", default_value = "0.0.0.0:50051")]
    address: SocketAddr,
}

#[derive(Debug, Default)]
struct MonitorState {
    nodes: HashMap<String, NodeState>,
}

struct MonitorService {
    state: Mutex<MonitorState>,
}

#[tonic::async_trait]
impl ChordMonitor for MonitorService {
    async fn report_state(&self, request: Request<NodeState>) -> Result<Response<Empty>, Status> {
        let node_state = request.into_inner();
        let id = hex(&node_state.id);
        log::info!(
            "node {id} at {}: predecessor={:?} successors={} stored_keys={}",
            node_state.address,
            node_state.predecessor.as_ref().map(|p| hex(&p.id)),
            node_state.successors.len(),
            node_state.stored_keys.len(),
        );
        self.state.lock().unwrap().nodes.insert(id, node_state);
        Ok(Response::new(Empty {}))
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let service = MonitorService {
        state: Mutex::new(MonitorState::default()),
    };

    log::info!("monitor listening on {}", args.address);
    Server::builder()
        .add_service(ChordMonitorServer::new(service))
        .serve(args.address)
        .await?;

    Ok(())
}
