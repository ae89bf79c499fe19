//! Wire protocol types shared by the portal crates.
//!
//! Covers the scheduler request/response envelopes, the block payloads
//! carried inside them, and the data model read from the chain.

pub mod constants;
pub mod envelope;
pub mod messages;
pub mod types;

// Re-export primary types for convenience.
pub use constants::Method;
pub use envelope::{Request, Response};
pub use messages::{DownloadBlockRequest, DownloadBlockResponse, UploadBlockRequest};
pub use types::{Endpoint, FileMeta, FileRecord, FileState};

/// Serde adapter that encodes `Vec<u8>` as a base64 string.
pub(crate) mod base64_bytes {
    use base64::{Engine, engine::general_purpose::STANDARD};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        STANDARD.encode(data).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        STANDARD.decode(&s).map_err(serde::de::Error::custom)
    }
}
