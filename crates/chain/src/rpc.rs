//! JSON-RPC 2.0 envelopes used to talk to the chain gateway.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::ChainError;

pub const JSONRPC_VERSION: &str = "2.0";

/// Gateway method names.
pub mod methods {
    pub const SCHEDULER_LIST: &str = "scheduler_list";
    pub const FILE_RECORD_META: &str = "file_recordMeta";
    pub const FILE_INFO: &str = "file_info";
    pub const FILE_LIST: &str = "file_list";
    pub const FILE_DELETE: &str = "file_delete";
}

/// Outgoing call.
#[derive(Debug, Serialize)]
pub struct RpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: serde_json::Value,
}

impl<'a> RpcRequest<'a> {
    pub fn new(id: u64, method: &'a str, params: serde_json::Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            method,
            params,
        }
    }
}

/// Gateway reply. Exactly one of `result` and `error` is expected; a
/// `null` result means the requested entity does not exist.
#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub result: Option<Box<RawValue>>,
    #[serde(default)]
    pub error: Option<RpcErrorObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
}

impl RpcResponse {
    /// Converts the reply into the typed result, `None` for a null result.
    pub fn into_result<T: DeserializeOwned>(self) -> Result<Option<T>, ChainError> {
        if let Some(err) = self.error {
            return Err(ChainError::Rpc {
                code: err.code,
                message: err.message,
            });
        }
        match self.result {
            Some(raw) => Ok(Some(serde_json::from_str(raw.get())?)),
            None => Ok(None),
        }
    }
}

/// Scheduler entry as stored on chain. `ip` is the base58-encoded
/// `host:port` string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerInfo {
    pub ip: String,
}
