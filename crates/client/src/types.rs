//! Results returned by the transfer flows.

use std::path::PathBuf;

/// Outcome of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    /// Id to use for download and delete.
    pub file_id: String,
    /// Number of blocks acknowledged by the scheduler.
    pub blocks: u32,
    /// Bytes sent (ciphertext size when encrypted).
    pub bytes_sent: u64,
    pub encrypted: bool,
    /// Where the passphrase was persisted, for private uploads.
    pub key_path: Option<PathBuf>,
}

/// Outcome of a successful download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadReceipt {
    /// Destination file.
    pub path: PathBuf,
    pub blocks: u32,
    /// Final size of the destination file.
    pub bytes_written: u64,
    pub decrypted: bool,
}
