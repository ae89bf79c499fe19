//! Client flows for CESS decentralized storage.
//!
//! This crate implements the **business logic** of the portal: it has no
//! terminal or configuration-file dependencies. The CLI supplies a
//! [`ClientConfig`], a [`MetadataBridge`](portal_chain::MetadataBridge) and a
//! [`Dialer`](portal_scheduler::Dialer).
//!
//! # Flows
//!
//! 1. **Upload**: validate, hash, record metadata on chain, pick a
//!    scheduler, optionally encrypt, then send 1 MiB blocks in order
//! 2. **Download**: check the record is active, pick a scheduler, pull
//!    blocks until the last one, optionally decrypt in place
//! 3. **Delete** / **Find**: pass-through chain calls

pub mod config;
pub mod delete;
pub mod download;
pub mod error;
pub mod find;
pub mod passphrase;
pub mod types;
pub mod upload;

#[cfg(test)]
mod tests_support;

// Re-export primary types for convenience.
pub use config::{ClientConfig, Timeouts};
pub use delete::delete_file;
pub use download::Downloader;
pub use error::{ClientError, ErrorKind};
pub use find::{FindResult, find_files};
pub use passphrase::{PassphraseSource, StaticPassphrase};
pub use types::{DownloadReceipt, UploadReceipt};
pub use upload::Uploader;
