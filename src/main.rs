//! Relay header daemon
//!
//! Standalone query node: opens the local header store and serves the
//! read-only JSON-RPC surface. Header ingestion happens through the
//! enclosing ledger executor, not through this process.

use relay_core::rpc::{start_rpc_server, RpcState};
use relay_core::store::SledKvStore;
use relay_core::sync::HeaderSyncer;
use std::sync::{Arc, Mutex};

const DEFAULT_DATA_DIR: &str = "relay-data";
const DEFAULT_PORT: u16 = 8045;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let data_dir = args.next().unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());
    let port: u16 = args
        .next()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    println!("Relay header daemon");
    println!("  Data dir: {}", data_dir);
    println!("  RPC port: {}", port);

    let kv = SledKvStore::open(&data_dir)?;
    let syncer = HeaderSyncer::new(kv);
    let state = Arc::new(RpcState {
        syncer: Arc::new(Mutex::new(syncer)),
    });

    start_rpc_server(state, port).await;
    Ok(())
}
