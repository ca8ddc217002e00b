use anyhow::{Context, Result};
use chord_proto::chord::chord_client::ChordClient;
use chord_proto::chord::{Empty, FindSuccessorRequest, GetRequest, PutRequest};
use chord_proto::ChordId;
use clap::{Parser, Subcommand};
use tonic::Request;

/// Out-of-process control surface: dial a running node and issue one RPC.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Address of the node to connect to.
    #[arg(short, long, default_value = "http://127.0.0.1:5000")]
    node: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the node owning <key>.
    Lookup { key: String },
    /// Resolve the successor of a raw 40-hex-character id.
    FindSuccessor { id: String },
    /// Check that the node is alive.
    Ping,
    /// Print the node's current predecessor.
    GetPredecessor,
    /// Print the node's current successor list.
    GetSuccessorList,
    /// Store a key/value pair in the ring.
    Put { key: String, value: String },
    /// Fetch a value from the ring.
    Get { key: String },
    /// Ask the node to leave the ring.
    Leave,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut client = ChordClient::connect(cli.node.clone())
        .await
        .with_context(|| format!("failed to connect to {}", cli.node))?;

    match cli.command {
        Commands::Lookup { key } => {
            let id = chord_proto::hash_addr(&key);
            let reply = client
                .find_successor(Request::new(FindSuccessorRequest {
                    id: id.as_bytes().to_vec(),
                }))
                .await?
                .into_inner();
            match reply.peer {
                Some(peer) => println!("{key} -> id={} address={}", hex(&peer.id), peer.address),
                None => println!("no answer"),
            }
        }
        Commands::FindSuccessor { id } => {
            let id = ChordId::from_hex40(&id).context("id must be exactly 40 hex characters")?;
            let reply = client
                .find_successor(Request::new(FindSuccessorRequest {
                    id: id.as_bytes().to_vec(),
                }))
                .await?
                .into_inner();
            match reply.peer {
                Some(peer) => println!("id={} address={} found={}", hex(&peer.id), peer.address, reply.found),
                None => println!("no answer"),
            }
        }
        Commands::Ping => {
            client.ping(Request::new(Empty {})).await?;
            println!("pong");
        }
        Commands::GetPredecessor => {
            let reply = client.get_predecessor(Request::new(Empty {})).await?.into_inner();
            match reply.peer {
                Some(p) => println!("predecessor: id={} address={}", hex(&p.id), p.address),
                None => println!("predecessor: none"),
            }
        }
        Commands::GetSuccessorList => {
            let reply = client.get_successor_list(Request::new(Empty {})).await?.into_inner();
            for (i, s) in reply.successors.iter().enumerate() {
                println!("[{i}] id={} address={}", hex(&s.id), s.address);
            }
        }
        Commands::Put { key, value } => {
            let reply = client.put(Request::new(PutRequest { key, value })).await?.into_inner();
            println!("put: {}", if reply.success { "ok" } else { "failed" });
        }
        Commands::Get { key } => {
            let reply = client.get(Request::new(GetRequest { key })).await?.into_inner();
            if reply.found {
                println!("value: {}", reply.value);
            } else {
                println!("not found");
            }
        }
        Commands::Leave => {
            client.leave(Request::new(Empty {})).await?;
            println!("leave requested");
        }
    }

    Ok(())
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
