//! Client error types.

use std::path::PathBuf;

use portal_chain::ChainError;
use portal_scheduler::SchedulerError;
use portal_transfer::TransferError;

/// Coarse classification of a [`ClientError`], used to pick exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad path, backup count, empty file or key.
    InputValidation,
    /// No schedulers, or none reachable.
    Discovery,
    /// Timeout or broken connection during a block exchange.
    Transport,
    /// Non-zero reply code, malformed payload or inconsistent block sequence.
    Protocol,
    /// Local file or key persistence failure.
    StorageIo,
    /// File exists but is not active yet.
    NotReady,
    /// Chain gateway failure.
    Metadata,
    /// Encryption or decryption failure.
    Crypto,
}

/// Errors produced by the client flows.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("file is empty and has no key, nothing to upload: {0}")]
    EmptyFile(String),

    #[error("invalid backup count {0:?}: expected an integer between 1 and 255")]
    InvalidBackupCount(String),

    #[error("encryption key must not be empty")]
    EmptyKey,

    #[error("failed to read file for hashing: {0}")]
    HashComputation(#[source] std::io::Error),

    #[error("no schedulers are registered on chain")]
    NoSchedulersConfigured,

    #[error("scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),

    #[error("scheduler rejected block {block} (code {code}): {message}")]
    BlockRejected {
        block: u32,
        code: i32,
        message: String,
    },

    #[error("malformed scheduler payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("inconsistent block sequence: {0}")]
    Sequence(#[source] TransferError),

    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("file {file_id} is not ready for download yet (state: {state})")]
    FileNotReady { file_id: String, state: String },

    #[error(transparent)]
    Chain(ChainError),

    #[error("local storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("failed to persist encryption key to {}: {source}", .path.display())]
    KeyPersist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("encryption failed")]
    EncryptionFailed,

    #[error("decryption failed: wrong passphrase or corrupted data")]
    DecryptionFailed,

    #[error("passphrase unavailable: {0}")]
    Passphrase(String),
}

impl ClientError {
    /// Classifies this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::InvalidPath(_)
            | ClientError::EmptyFile(_)
            | ClientError::InvalidBackupCount(_)
            | ClientError::EmptyKey
            | ClientError::Passphrase(_) => ErrorKind::InputValidation,
            ClientError::HashComputation(_)
            | ClientError::Storage(_)
            | ClientError::KeyPersist { .. } => ErrorKind::StorageIo,
            ClientError::NoSchedulersConfigured => ErrorKind::Discovery,
            ClientError::Scheduler(e) => match e {
                SchedulerError::AllEndpointsUnreachable { .. } => ErrorKind::Discovery,
                e if e.is_protocol() => ErrorKind::Protocol,
                _ => ErrorKind::Transport,
            },
            ClientError::BlockRejected { .. }
            | ClientError::Payload(_)
            | ClientError::Sequence(_) => ErrorKind::Protocol,
            ClientError::FileNotFound(_) | ClientError::Chain(_) => ErrorKind::Metadata,
            ClientError::FileNotReady { .. } => ErrorKind::NotReady,
            ClientError::EncryptionFailed | ClientError::DecryptionFailed => ErrorKind::Crypto,
        }
    }
}

impl From<TransferError> for ClientError {
    fn from(e: TransferError) -> Self {
        match e {
            TransferError::InvalidPath(p) => ClientError::InvalidPath(p),
            TransferError::InvalidBackupCount(raw) => ClientError::InvalidBackupCount(raw),
            TransferError::EmptyKey => ClientError::EmptyKey,
            TransferError::EncryptionFailed => ClientError::EncryptionFailed,
            TransferError::DecryptionFailed => ClientError::DecryptionFailed,
            e @ (TransferError::OutOfOrderBlock { .. }
            | TransferError::TotalBlocksChanged { .. }
            | TransferError::BlockOutOfRange { .. }) => ClientError::Sequence(e),
        }
    }
}

impl From<ChainError> for ClientError {
    fn from(e: ChainError) -> Self {
        match e {
            ChainError::NotFound(id) => ClientError::FileNotFound(id),
            other => ClientError::Chain(other),
        }
    }
}
