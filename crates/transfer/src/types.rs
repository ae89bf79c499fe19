/// A contiguous slice of a payload, sent as one request/response exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block<'a> {
    /// 1-based position of this block.
    pub index: u32,
    /// Total number of blocks in the payload.
    pub total: u32,
    /// Block bytes.
    pub data: &'a [u8],
}

/// Identity of a file being uploaded, fixed before any network call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileIdentity {
    /// Locally generated, time-ordered unique id.
    pub id: String,
    /// Original file name (no directories).
    pub name: String,
    /// SHA-256 hex digest of the plaintext content.
    pub content_hash: String,
    /// Plaintext size in bytes.
    pub size_bytes: u64,
    pub backups: u8,
}

impl FileIdentity {
    /// Builds an identity for `content`, generating a fresh id.
    pub fn new(name: impl Into<String>, content: &[u8], backups: u8) -> Self {
        Self {
            id: new_file_id(),
            name: name.into(),
            content_hash: crate::checksum_bytes(content),
            size_bytes: content.len() as u64,
            backups,
        }
    }
}

/// Generates a globally unique file id that sorts by creation time.
///
/// UUIDv7 rendered as 32 lowercase hex characters.
pub fn new_file_id() -> String {
    uuid::Uuid::now_v7().simple().to_string()
}
