//! Block partitioning, file identity, encryption and local path checks.
//!
//! Everything here is synchronous and free of network I/O; the drivers in
//! `portal-client` compose these pieces into the upload and download loops.

mod chunked;
mod crypto;
mod types;
mod validation;

pub use chunked::{BlockSequence, Blocks, block_count, checksum_bytes, split_blocks};
pub use crypto::{NONCE_LEN, decrypt, encrypt};
pub use types::{Block, FileIdentity, new_file_id};
pub use validation::{parse_backups, validate_file_name, validate_source_file};

/// Errors produced by the transfer crate.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("invalid backup count: {0}")]
    InvalidBackupCount(String),

    #[error("encryption key must not be empty")]
    EmptyKey,

    #[error("encryption failed")]
    EncryptionFailed,

    #[error("decryption failed: wrong key or corrupted data")]
    DecryptionFailed,

    #[error("expected block {expected}, got block {got}")]
    OutOfOrderBlock { expected: u32, got: u32 },

    #[error("total block count changed from {expected} to {got}")]
    TotalBlocksChanged { expected: u32, got: u32 },

    #[error("block {index} is outside 1..={total}")]
    BlockOutOfRange { index: u32, total: u32 },
}
