use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Service name every scheduler request is addressed to.
pub const SCHEDULER_SERVICE: &str = "wservice";

/// Size of one file block (1 MiB). The final block holds the remainder.
pub const BLOCK_SIZE: usize = 1024 * 1024;

/// Maximum WebSocket message size in bytes (8 MiB).
///
/// A 1 MiB block grows by a third once base64-encoded and is wrapped twice
/// (payload, then envelope), so replies stay well under this.
pub const WS_MAX_MESSAGE_SIZE: usize = 8 * 1024 * 1024;

/// Per-endpoint connect timeout when uploading.
pub const UPLOAD_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Timeout for one upload block round trip.
pub const UPLOAD_BLOCK_TIMEOUT: Duration = Duration::from_secs(20);

/// Per-endpoint connect timeout when downloading.
pub const DOWNLOAD_CONNECT_TIMEOUT: Duration = Duration::from_secs(1);

/// Timeout for one download block round trip.
pub const DOWNLOAD_BLOCK_TIMEOUT: Duration = Duration::from_secs(60);

/// Response code for a successful call. Anything else is a failure.
pub const CODE_OK: i32 = 0;

/// Scheduler method identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    /// Stores one block of a file.
    #[serde(rename = "writefile")]
    WriteFile,
    /// Reads one block of a file.
    #[serde(rename = "readfile")]
    ReadFile,

    /// Forward compatibility: unknown methods deserialize here.
    #[serde(other)]
    Unknown,
}
