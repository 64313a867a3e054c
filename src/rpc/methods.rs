//! RPC method implementations
//!
//! Each method is a pure read over the header store: a chain id plus a
//! height or hash in, hex-encoded header bytes and tip metadata out.

use crate::codec::Hash;
use crate::store::{HeaderRecord, SledKvStore};
use crate::sync::{HeaderSyncer, SyncError};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// JSON-RPC 2.0 Request
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: Option<serde_json::Value>,
    pub id: serde_json::Value,
}

/// JSON-RPC 2.0 Response
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<JsonRpcError>,
    pub id: serde_json::Value,
}

/// JSON-RPC Error
#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

impl JsonRpcResponse {
    pub fn success(id: serde_json::Value, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn error(id: serde_json::Value, code: i32, message: String) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(JsonRpcError { code, message }),
            id,
        }
    }
}

/// RPC handler state
pub struct RpcState {
    pub syncer: Arc<Mutex<HeaderSyncer<SledKvStore>>>,
}

/// Process a JSON-RPC request and return a response
pub fn handle_request(state: &RpcState, request: JsonRpcRequest) -> JsonRpcResponse {
    match request.method.as_str() {
        "getbestblockheader" => get_best_block_header(state, request.id, request.params),
        "getheaderbyheight" => get_header_by_height(state, request.id, request.params),
        "getheaderbyhash" => get_header_by_hash(state, request.id, request.params),
        _ => JsonRpcResponse::error(
            request.id,
            -32601,
            format!("Method not found: {}", request.method),
        ),
    }
}

/// Returns the canonical tip header of a chain
fn get_best_block_header(
    state: &RpcState,
    id: serde_json::Value,
    params: Option<serde_json::Value>,
) -> JsonRpcResponse {
    let chain_id = match param_u64(&params, 0) {
        Some(v) => v,
        None => return JsonRpcResponse::error(id, -32602, "Invalid params: expected [chain_id]".into()),
    };

    let syncer = state.syncer.lock().unwrap();
    match syncer.best_header(chain_id) {
        Ok(record) => JsonRpcResponse::success(id, header_json(&record)),
        Err(e) => rpc_error(id, e),
    }
}

/// Returns the canonical header at a height
fn get_header_by_height(
    state: &RpcState,
    id: serde_json::Value,
    params: Option<serde_json::Value>,
) -> JsonRpcResponse {
    let (chain_id, height) = match (param_u64(&params, 0), param_u64(&params, 1)) {
        (Some(c), Some(h)) if h <= u32::MAX as u64 => (c, h as u32),
        _ => {
            return JsonRpcResponse::error(
                id,
                -32602,
                "Invalid params: expected [chain_id, height]".into(),
            )
        }
    };

    let syncer = state.syncer.lock().unwrap();
    match syncer.header_by_height(chain_id, height) {
        Ok(record) => JsonRpcResponse::success(id, header_json(&record)),
        Err(e) => rpc_error(id, e),
    }
}

/// Returns any stored header by hash, canonical or fork
fn get_header_by_hash(
    state: &RpcState,
    id: serde_json::Value,
    params: Option<serde_json::Value>,
) -> JsonRpcResponse {
    let chain_id = match param_u64(&params, 0) {
        Some(v) => v,
        None => {
            return JsonRpcResponse::error(
                id,
                -32602,
                "Invalid params: expected [chain_id, hash]".into(),
            )
        }
    };
    let hash = match param_str(&params, 1).and_then(|s| Hash::from_hex(&s).ok()) {
        Some(h) => h,
        None => return JsonRpcResponse::error(id, -5, "Invalid header hash".into()),
    };

    let syncer = state.syncer.lock().unwrap();
    match syncer.header_by_hash(chain_id, &hash) {
        Ok(record) => JsonRpcResponse::success(id, header_json(&record)),
        Err(e) => rpc_error(id, e),
    }
}

fn header_json(record: &HeaderRecord) -> serde_json::Value {
    serde_json::json!({
        "hash": record.hash().to_string(),
        "height": record.height,
        "cumulativework": record.cumulative_work.to_string(),
        "header": hex::encode(&record.raw),
    })
}

fn rpc_error(id: serde_json::Value, err: SyncError) -> JsonRpcResponse {
    match err {
        SyncError::NotFound => JsonRpcResponse::error(id, -5, "Header not found".into()),
        other => JsonRpcResponse::error(id, -32603, other.to_string()),
    }
}

fn param_u64(params: &Option<serde_json::Value>, index: usize) -> Option<u64> {
    match params {
        Some(serde_json::Value::Array(arr)) => arr.get(index)?.as_u64(),
        Some(serde_json::Value::Number(n)) if index == 0 => n.as_u64(),
        _ => None,
    }
}

fn param_str(params: &Option<serde_json::Value>, index: usize) -> Option<String> {
    match params {
        Some(serde_json::Value::Array(arr)) => arr.get(index)?.as_str().map(|s| s.to_string()),
        _ => None,
    }
}
