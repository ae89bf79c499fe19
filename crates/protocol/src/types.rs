use std::fmt;

use serde::{Deserialize, Serialize};

/// Network address of a scheduler (`host:port` or a full `ws://` URL).
///
/// Scheduler lists are ordered: the first endpoint is preferred.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Endpoint(String);

impl Endpoint {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// The address as stored on chain (after decoding).
    pub fn address(&self) -> &str {
        &self.0
    }

    /// WebSocket URL used to dial this scheduler.
    pub fn ws_url(&self) -> String {
        if self.0.starts_with("ws://") || self.0.starts_with("wss://") {
            self.0.clone()
        } else {
            format!("ws://{}", self.0)
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle state of a file record on chain.
///
/// Only `Active` files can be downloaded. Everything else means the
/// network has not finished backing the file up yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FileState {
    Pending,
    Active,
    Other(String),
}

impl FileState {
    pub fn is_active(&self) -> bool {
        matches!(self, FileState::Active)
    }

    pub fn as_str(&self) -> &str {
        match self {
            FileState::Pending => "pending",
            FileState::Active => "active",
            FileState::Other(s) => s,
        }
    }
}

impl From<String> for FileState {
    fn from(s: String) -> Self {
        match s.as_str() {
            "pending" => FileState::Pending,
            "active" => FileState::Active,
            _ => FileState::Other(s),
        }
    }
}

impl From<FileState> for String {
    fn from(state: FileState) -> Self {
        match state {
            FileState::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for FileState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// File record as read back from the chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub state: FileState,
    pub is_public: bool,
    #[serde(default)]
    pub hash: String,
    #[serde(default, skip_serializing_if = "is_zero_u8")]
    pub backups: u8,
    #[serde(default, skip_serializing_if = "is_zero_u64")]
    pub size_kb: u64,
}

/// File metadata declared on chain before any block is uploaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMeta {
    pub file_id: String,
    pub file_name: String,
    pub file_hash: String,
    pub is_public: bool,
    pub backups: u8,
    pub size_kb: u64,
}

impl FileMeta {
    /// Size in KiB as recorded on chain: never below 1.
    pub fn size_kb_for(size_bytes: u64) -> u64 {
        (size_bytes / 1024).max(1)
    }
}

fn is_zero_u8(v: &u8) -> bool {
    *v == 0
}

fn is_zero_u64(v: &u64) -> bool {
    *v == 0
}
