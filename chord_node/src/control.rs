//! The interactive control surface (§4.J): `Lookup`, `PrintState`, `Help`,
//! `Exit`, plus the supplemented `Put`/`Get` wrappers. Deliberately thin —
//! this is not part of the distributed protocol.

use crate::node::Node;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Lookup(String),
    Put(String, String),
    Get(String),
    PrintState,
    Help,
    Exit,
}

#[derive(Debug, PartialEq, Eq)]
pub struct UnknownCommand(pub String);

/// Parses one whitespace-separated input line. Command names are
/// case-insensitive (§6).
pub fn parse_command(line: &str) -> Result<Command, UnknownCommand> {
    let mut parts = line.split_whitespace();
    let verb = parts.next().unwrap_or_default();

    match verb.to_ascii_lowercase().as_str() {
        "lookup" => match parts.next() {
            Some(key) => Ok(Command::Lookup(key.to_string())),
            None => Err(UnknownCommand("lookup requires a <key> argument".into())),
        },
        "put" => {
            let key = parts.next();
            let value = parts.next();
            match (key, value) {
                (Some(k), Some(v)) => Ok(Command::Put(k.to_string(), v.to_string())),
                _ => Err(UnknownCommand("put requires <key> <value> arguments".into())),
            }
        }
        "get" => match parts.next() {
            Some(key) => Ok(Command::Get(key.to_string())),
            None => Err(UnknownCommand("get requires a <key> argument".into())),
        },
        "printstate" => Ok(Command::PrintState),
        "help" => Ok(Command::Help),
        "exit" => Ok(Command::Exit),
        "" => Err(UnknownCommand(String::new())),
        other => Err(UnknownCommand(format!("unknown command: {other}"))),
    }
}

const HELP_TEXT: &str = "\
Commands:
  lookup <key>       resolve the node owning <key>
  put <key> <value>  store a value in the ring
  get <key>          fetch a value from the ring
  printstate         dump this node's ring state
  help               show this message
  exit               shut the node down";

/// Runs the stdin command loop until `Exit` or EOF. Local I/O errors are
/// printed and the loop continues (§7).
pub async fn run(node: Arc<Node>) {
    let stdin = tokio::io::stdin();
    let mut lines = BufReader::new(stdin).lines();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if line.trim().is_empty() {
                    continue;
                }
                match parse_command(&line) {
                    Ok(Command::Exit) => {
                        node.leave_network().await;
                        std::process::exit(0);
                    }
                    Ok(command) => execute(&node, command).await,
                    Err(UnknownCommand(msg)) => println!("error: {msg}"),
                }
            }
            Ok(None) => {
                // EOF on stdin: exit cleanly, same as an explicit `Exit`.
                node.leave_network().await;
                std::process::exit(0);
            }
            Err(e) => println!("error: console read failed: {e}"),
        }
    }
}

async fn execute(node: &Arc<Node>, command: Command) {
    match command {
        Command::Lookup(key) => {
            let id = chord_proto::hash_addr(&key);
            match node.find_successor(id).await {
                Ok(peer) => println!("{key} -> id={} address={}", peer.id, peer.address),
                Err(e) => println!("error: lookup failed: {e}"),
            }
        }
        Command::Put(key, value) => match node.put(key.clone(), value).await {
            Ok(true) => println!("put {key}: ok"),
            Ok(false) => println!("put {key}: failed"),
            Err(e) => println!("error: put failed: {e}"),
        },
        Command::Get(key) => match node.get(key.clone()).await {
            Ok((value, true)) => println!("{key} = {value}"),
            Ok((_, false)) => println!("{key}: not found"),
            Err(e) => println!("error: get failed: {e}"),
        },
        Command::PrintState => print_state(node).await,
        Command::Help => println!("{HELP_TEXT}"),
        Command::Exit => unreachable!("handled in run()"),
    }
}

async fn print_state(node: &Arc<Node>) {
    let state = node.state.read().await;

    println!("self: id={} address={}", node.id, node.addr);
    match &state.predecessor {
        Some(p) => println!("predecessor: {p}"),
        None => println!("predecessor: none"),
    }
    println!("successors:");
    for (i, s) in state.successors.iter().enumerate() {
        println!("  [{i}] {s}");
    }

    println!("finger table (distinct entries):");
    let mut last_address: Option<&str> = None;
    for (i, f) in state.finger_table.iter().enumerate() {
        if last_address == Some(f.address.as_str()) {
            continue;
        }
        last_address = Some(f.address.as_str());
        println!("  [{}] {f}", i + 1);
    }
}
