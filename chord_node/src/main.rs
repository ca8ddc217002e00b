use anyhow::{bail, Context, Result};
use chord_node::constants::{
    DEFAULT_PORT, LOCALHOST, MAX_PERIOD_MS, MAX_SUCCESSOR_LIST_LEN, MIN_PERIOD_MS,
    MIN_SUCCESSOR_LIST_LEN,
};
use chord_node::control;
use chord_node::node::Node;
use chord_proto::chord::chord_server::ChordServer;
use chord_proto::ChordId;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::time::{interval, Duration};
use tonic::transport::Server;

/// A Chord DHT node: forms a new ring, or joins one via a bootstrap peer.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Local bind address (IP or hostname).
    #[arg(short = 'a', long = "address", default_value = LOCALHOST)]
    address: String,

    /// Local bind port.
    #[arg(short = 'p', long = "port", default_value_t = DEFAULT_PORT, value_parser = clap::value_parser!(u16).range(1..))]
    port: u16,

    /// Bootstrap peer host; requires --jp. Omit both to form a new ring.
    #[arg(long = "ja", requires = "join_port")]
    join_address: Option<String>,

    /// Bootstrap peer port; requires --ja.
    #[arg(long = "jp", id = "join_port", requires = "join_address")]
    join_port: Option<u16>,

    /// Stabilize period in milliseconds, 1..=60000.
    #[arg(long = "ts", value_parser = clap::value_parser!(u64).range(MIN_PERIOD_MS as i64..=MAX_PERIOD_MS as i64))]
    stabilize_ms: u64,

    /// Fix-fingers period in milliseconds, 1..=60000.
    #[arg(long = "tff", value_parser = clap::value_parser!(u64).range(MIN_PERIOD_MS as i64..=MAX_PERIOD_MS as i64))]
    fix_fingers_ms: u64,

    /// Check-predecessor period in milliseconds, 1..=60000.
    #[arg(long = "tcp", value_parser = clap::value_parser!(u64).range(MIN_PERIOD_MS as i64..=MAX_PERIOD_MS as i64))]
    check_predecessor_ms: u64,

    /// Successor list length, 1..=32.
    #[arg(short = 'r', value_parser = clap::value_parser!(u64).range(MIN_SUCCESSOR_LIST_LEN as i64..=MAX_SUCCESSOR_LIST_LEN as i64))]
    successor_list_len: u64,

    /// Override the computed 160-bit id; must be exactly 40 hex characters.
    #[arg(short = 'i', long = "id-override")]
    id_override: Option<String>,

    /// Optional monitor address to report state to (ambient, not part of the ring protocol).
    #[arg(short = 'm', long = "monitor")]
    monitor: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let override_id = match &args.id_override {
        Some(hex) => Some(ChordId::from_hex40(hex).with_context(|| {
            format!("-i/--id-override {hex:?} must be exactly 40 hex characters")
        })?),
        None => None,
    };

    let addr_str = format!("{}:{}", args.address, args.port);
    let bind_addr: SocketAddr = addr_str
        .parse()
        .with_context(|| format!("invalid bind address {addr_str:?}"))?;
    let r = args.successor_list_len as usize;

    let node = match (&args.join_address, args.join_port) {
        (Some(host), Some(port)) => {
            let node = Node::new(addr_str.clone(), r, override_id);
            let bootstrap = format!("{host}:{port}");
            log::info!("node {}: joining ring via {bootstrap}", node.id);
            node.join(bootstrap)
                .await
                .context("failed to join ring via bootstrap peer")?;
            node
        }
        (None, None) => {
            log::info!("node starting at {addr_str}, forming a new ring");
            Node::create(addr_str.clone(), r, override_id)
        }
        _ => bail!("--ja and --jp must be given together or not at all"),
    };

    log::info!("node {}: listening on {bind_addr}", node.id);
    let node = Arc::new(node);

    spawn_stabilizer(node.clone(), args.stabilize_ms);
    spawn_finger_fixer(node.clone(), args.fix_fingers_ms);
    spawn_predecessor_checker(node.clone(), args.check_predecessor_ms);
    if let Some(monitor_addr) = args.monitor.clone() {
        spawn_monitor_reporter(node.clone(), monitor_addr);
    }

    let control_node = node.clone();
    tokio::spawn(async move {
        control::run(control_node).await;
    });

    Server::builder()
        .add_service(ChordServer::new((*node).clone()))
        .serve(bind_addr)
        .await
        .context("gRPC server failed")?;

    Ok(())
}

fn spawn_stabilizer(node: Arc<Node>, period_ms: u64) {
    tokio::spawn(async move {
        let mut ticker = interval(Duration::from_millis(period_ms));
        loop {
            ticker.tick().await;
            node.stabilize().await;
        }
    });
}

fn spawn_finger_fixer(node: Arc<Node>, period_ms: u64) {
    tokio::spawn(async move {
        let mut ticker = interval(Duration::from_millis(period_ms));
        loop {
            ticker.tick().await;
            node.fix_fingers().await;
        }
    });
}

fn spawn_predecessor_checker(node: Arc<Node>, period_ms: u64) {
    tokio::spawn(async move {
        let mut ticker = interval(Duration::from_millis(period_ms));
        loop {
            ticker.tick().await;
            node.check_predecessor().await;
        }
    });
}

/// Ambient observability, not one of the three core periodic procedures.
fn spawn_monitor_reporter(node: Arc<Node>, monitor_addr: String) {
    tokio::spawn(async move {
        let mut ticker = interval(Duration::from_secs(1));
        loop {
            ticker.tick().await;
            node.report_to_monitor(&monitor_addr).await;
        }
    });
}
