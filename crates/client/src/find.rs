//! Find flow: look up one file record, or list the account's files.

use tracing::debug;

use portal_chain::MetadataBridge;
use portal_protocol::types::FileRecord;

use crate::error::ClientError;

/// What [`find_files`] returned.
#[derive(Debug, Clone, PartialEq)]
pub enum FindResult {
    /// Record of the requested file.
    Record(FileRecord),
    /// Ids of all files owned by the configured account.
    Listing(Vec<String>),
}

/// Returns the record for `file_id`, or the account's file ids when no id
/// is given.
pub async fn find_files(
    bridge: &dyn MetadataBridge,
    file_id: Option<&str>,
) -> Result<FindResult, ClientError> {
    match file_id {
        Some(id) => {
            let record = bridge.file_info(id).await?;
            debug!(file_id = id, state = %record.state, "file record found");
            Ok(FindResult::Record(record))
        }
        None => {
            let ids = bridge.list_files().await?;
            debug!(count = ids.len(), "files listed");
            Ok(FindResult::Listing(ids))
        }
    }
}
