//! Chain-side collaborator for the portal client.
//!
//! Exposes the [`MetadataBridge`] trait (scheduler discovery, file metadata,
//! deletion) and a JSON-RPC implementation talking to a chain gateway.

pub mod bridge;
pub mod error;
pub mod rpc;

pub use bridge::{BridgeFuture, JsonRpcBridge, MetadataBridge, decode_endpoint};
pub use error::ChainError;
