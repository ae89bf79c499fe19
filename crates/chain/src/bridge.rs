//! Metadata bridge: the chain operations the portal depends on.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use portal_protocol::types::{Endpoint, FileMeta, FileRecord};

use crate::ChainError;
use crate::rpc::{RpcRequest, RpcResponse, SchedulerInfo, methods};

/// Boxed future returned by [`MetadataBridge`] methods.
pub type BridgeFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ChainError>> + Send + 'a>>;

/// On-chain operations used by the upload, download, delete and find flows.
pub trait MetadataBridge: Send + Sync {
    /// Ordered list of schedulers; the first entry is preferred.
    fn list_schedulers(&self) -> BridgeFuture<'_, Vec<Endpoint>>;

    /// Declares a file before any block is uploaded. Returns the chain's
    /// confirmation (transaction hash).
    fn record_file_meta<'a>(&'a self, meta: &'a FileMeta) -> BridgeFuture<'a, String>;

    /// Reads a file record. A missing file is [`ChainError::NotFound`].
    fn file_info<'a>(&'a self, file_id: &'a str) -> BridgeFuture<'a, FileRecord>;

    /// Lists the ids of all files owned by the configured account.
    fn list_files(&self) -> BridgeFuture<'_, Vec<String>>;

    /// Deletes a file owned by the configured account.
    fn delete_file<'a>(&'a self, file_id: &'a str) -> BridgeFuture<'a, ()>;
}

/// Decodes a scheduler address as stored on chain (base58 of `host:port`).
pub fn decode_endpoint(raw: &str) -> Result<Endpoint, ChainError> {
    let bytes = bs58::decode(raw.trim())
        .into_vec()
        .map_err(|e| ChainError::InvalidEndpoint(format!("{raw}: {e}")))?;
    let address = String::from_utf8(bytes)
        .map_err(|_| ChainError::InvalidEndpoint(format!("{raw}: not UTF-8")))?;
    if address.is_empty() {
        return Err(ChainError::InvalidEndpoint(format!("{raw}: empty address")));
    }
    Ok(Endpoint::new(address))
}

/// [`MetadataBridge`] backed by a JSON-RPC 2.0 gateway reachable over HTTP.
pub struct JsonRpcBridge {
    http: reqwest::Client,
    rpc_addr: String,
    account: String,
    next_id: AtomicU64,
}

impl JsonRpcBridge {
    /// Request timeout applied to every gateway call.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Creates a bridge posting to `rpc_addr` on behalf of `account`.
    pub fn new(rpc_addr: impl Into<String>, account: impl Into<String>) -> Result<Self, ChainError> {
        let http = reqwest::Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            rpc_addr: rpc_addr.into(),
            account: account.into(),
            next_id: AtomicU64::new(1),
        })
    }

    /// Performs one JSON-RPC call. `Ok(None)` means a null result.
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<Option<T>, ChainError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!(method, id, "chain call");

        let request = RpcRequest::new(id, method, params);
        let resp = self.http.post(&self.rpc_addr).json(&request).send().await?;
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ChainError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.bytes().await?;
        let reply: RpcResponse = serde_json::from_slice(&body)?;
        if reply.id != 0 && reply.id != id {
            warn!(expected = id, got = reply.id, "gateway reply id mismatch");
        }
        reply.into_result()
    }

    async fn schedulers(&self) -> Result<Vec<Endpoint>, ChainError> {
        let infos: Vec<SchedulerInfo> = self
            .call(methods::SCHEDULER_LIST, serde_json::json!([]))
            .await?
            .unwrap_or_default();

        let mut endpoints = Vec::with_capacity(infos.len());
        for info in infos {
            match decode_endpoint(&info.ip) {
                Ok(ep) => endpoints.push(ep),
                Err(e) => warn!(error = %e, "skipping scheduler entry"),
            }
        }
        debug!(count = endpoints.len(), "schedulers listed");
        Ok(endpoints)
    }

    async fn record_meta(&self, meta: &FileMeta) -> Result<String, ChainError> {
        let confirmation: Option<String> = self
            .call(
                methods::FILE_RECORD_META,
                serde_json::json!([self.account, meta]),
            )
            .await?;
        match confirmation {
            Some(tx) if !tx.is_empty() => Ok(tx),
            _ => Err(ChainError::MissingConfirmation {
                method: methods::FILE_RECORD_META,
            }),
        }
    }

    async fn info(&self, file_id: &str) -> Result<FileRecord, ChainError> {
        self.call(methods::FILE_INFO, serde_json::json!([file_id]))
            .await?
            .ok_or_else(|| ChainError::NotFound(file_id.to_string()))
    }

    async fn files(&self) -> Result<Vec<String>, ChainError> {
        Ok(self
            .call(methods::FILE_LIST, serde_json::json!([self.account]))
            .await?
            .unwrap_or_default())
    }

    async fn delete(&self, file_id: &str) -> Result<(), ChainError> {
        let _: Option<serde::de::IgnoredAny> = self
            .call(
                methods::FILE_DELETE,
                serde_json::json!([self.account, file_id]),
            )
            .await?;
        Ok(())
    }
}

impl MetadataBridge for JsonRpcBridge {
    fn list_schedulers(&self) -> BridgeFuture<'_, Vec<Endpoint>> {
        Box::pin(self.schedulers())
    }

    fn record_file_meta<'a>(&'a self, meta: &'a FileMeta) -> BridgeFuture<'a, String> {
        Box::pin(self.record_meta(meta))
    }

    fn file_info<'a>(&'a self, file_id: &'a str) -> BridgeFuture<'a, FileRecord> {
        Box::pin(self.info(file_id))
    }

    fn list_files(&self) -> BridgeFuture<'_, Vec<String>> {
        Box::pin(self.files())
    }

    fn delete_file<'a>(&'a self, file_id: &'a str) -> BridgeFuture<'a, ()> {
        Box::pin(self.delete(file_id))
    }
}
