//! Delete flow.

use tracing::info;

use portal_chain::MetadataBridge;

use crate::error::ClientError;

/// Deletes `file_id` on chain.
///
/// No local state is touched; a rejection from the chain is returned with
/// its message unchanged.
pub async fn delete_file(bridge: &dyn MetadataBridge, file_id: &str) -> Result<(), ClientError> {
    bridge.delete_file(file_id).await?;
    info!(file_id, "file deleted");
    Ok(())
}
