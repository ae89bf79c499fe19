//! Runtime configuration passed into every flow.

use std::path::PathBuf;
use std::time::Duration;

use portal_protocol::constants::{
    DOWNLOAD_BLOCK_TIMEOUT, DOWNLOAD_CONNECT_TIMEOUT, UPLOAD_BLOCK_TIMEOUT, UPLOAD_CONNECT_TIMEOUT,
};

/// Network timeouts for the transfer flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Per-endpoint dial timeout when uploading.
    pub upload_connect: Duration,
    /// Round trip for one uploaded block.
    pub upload_block: Duration,
    /// Per-endpoint dial timeout when downloading.
    pub download_connect: Duration,
    /// Round trip for one downloaded block.
    pub download_block: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            upload_connect: UPLOAD_CONNECT_TIMEOUT,
            upload_block: UPLOAD_BLOCK_TIMEOUT,
            download_connect: DOWNLOAD_CONNECT_TIMEOUT,
            download_block: DOWNLOAD_BLOCK_TIMEOUT,
        }
    }
}

/// Read-only settings shared by the flows for one invocation.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Where downloaded files are written.
    pub install_dir: PathBuf,
    /// Where encryption passphrases are persisted on upload.
    pub key_dir: PathBuf,
    /// Account address sent with download requests.
    pub wallet_address: String,
    pub timeouts: Timeouts,
}

impl ClientConfig {
    pub fn new(
        install_dir: impl Into<PathBuf>,
        key_dir: impl Into<PathBuf>,
        wallet_address: impl Into<String>,
    ) -> Self {
        Self {
            install_dir: install_dir.into(),
            key_dir: key_dir.into(),
            wallet_address: wallet_address.into(),
            timeouts: Timeouts::default(),
        }
    }

    /// Path of the persisted passphrase for `file_name`.
    pub fn key_path(&self, file_name: &str) -> PathBuf {
        self.key_dir.join(format!("{file_name}.pem"))
    }
}
