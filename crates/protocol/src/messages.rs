use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Upload
// ---------------------------------------------------------------------------

/// One block of a file sent to a scheduler.
///
/// `block_size` is the plaintext size of the whole file in bytes; `blocks`
/// is the total number of blocks in this upload. The `data` field is
/// base64-encoded in JSON, like every byte field on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadBlockRequest {
    pub backups: u8,
    pub file_id: String,
    pub block_num: u32,
    pub block_size: u64,
    pub blocks: u32,
    pub file_hash: String,
    #[serde(with = "crate::base64_bytes")]
    pub data: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Download
// ---------------------------------------------------------------------------

/// Asks a scheduler for one block of a stored file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadBlockRequest {
    pub file_id: String,
    pub wallet_address: String,
    pub block_num: u32,
}

/// One block of a stored file returned by a scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadBlockResponse {
    pub block_num: u32,
    pub blocks: u32,
    #[serde(default, with = "crate::base64_bytes")]
    pub data: Vec<u8>,
}
