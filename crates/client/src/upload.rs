//! Upload flow: declare the file on chain, then stream it to a scheduler.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use portal_chain::MetadataBridge;
use portal_protocol::constants::{BLOCK_SIZE, Method};
use portal_protocol::envelope::Request;
use portal_protocol::messages::UploadBlockRequest;
use portal_protocol::types::FileMeta;
use portal_scheduler::{Dialer, SchedulerConnection, connect_first};
use portal_transfer::{FileIdentity, encrypt, parse_backups, split_blocks, validate_source_file};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::types::UploadReceipt;

/// Runs uploads against one bridge and one dialer.
pub struct Uploader<'a, D: Dialer> {
    config: &'a ClientConfig,
    bridge: &'a dyn MetadataBridge,
    dialer: &'a D,
}

impl<'a, D: Dialer> Uploader<'a, D> {
    pub fn new(config: &'a ClientConfig, bridge: &'a dyn MetadataBridge, dialer: &'a D) -> Self {
        Self {
            config,
            bridge,
            dialer,
        }
    }

    /// Uploads the file at `path`.
    ///
    /// `backups` is the raw operator input. A missing or empty `key` makes
    /// the file public; otherwise the key is persisted locally and the
    /// content is encrypted before it leaves the machine.
    ///
    /// Metadata is recorded on chain before any block is sent. Any failure
    /// once the block loop starts aborts the upload without retry.
    pub async fn upload(
        &self,
        path: &Path,
        backups: &str,
        key: Option<&str>,
    ) -> Result<UploadReceipt, ClientError> {
        // 1. Validate input before touching the network.
        validate_source_file(path)?;
        let backups = parse_backups(backups)?;
        let key = key.filter(|k| !k.is_empty());
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| ClientError::InvalidPath(path.display().to_string()))?;

        // 2. Read and identify.
        let content = tokio::fs::read(path)
            .await
            .map_err(ClientError::HashComputation)?;
        // Ciphertext is never empty, so only a plain empty file has no blocks.
        if content.is_empty() && key.is_none() {
            return Err(ClientError::EmptyFile(path.display().to_string()));
        }
        let identity = FileIdentity::new(&file_name, &content, backups);
        info!(
            file_id = %identity.id,
            name = %identity.name,
            bytes = identity.size_bytes,
            backups,
            encrypted = key.is_some(),
            "starting upload"
        );

        // 3. Declare on chain.
        let meta = FileMeta {
            file_id: identity.id.clone(),
            file_name: identity.name.clone(),
            file_hash: identity.content_hash.clone(),
            is_public: key.is_none(),
            backups,
            size_kb: FileMeta::size_kb_for(identity.size_bytes),
        };
        let confirmation = self.bridge.record_file_meta(&meta).await?;
        debug!(file_id = %identity.id, tx = %confirmation, "file metadata recorded");

        // 4. Pick a scheduler.
        let endpoints = self.bridge.list_schedulers().await?;
        if endpoints.is_empty() {
            return Err(ClientError::NoSchedulersConfigured);
        }
        let mut conn =
            connect_first(self.dialer, &endpoints, self.config.timeouts.upload_connect).await?;

        // 5. Persist key and encrypt.
        let (payload, key_path) = match key {
            Some(key) => {
                let key_path = match persist_key(&self.config.key_path(&file_name), key).await {
                    Ok(p) => p,
                    Err(e) => {
                        conn.close().await;
                        return Err(e);
                    }
                };
                match encrypt(&content, key) {
                    Ok(ciphertext) => (ciphertext, Some(key_path)),
                    Err(e) => {
                        conn.close().await;
                        return Err(e.into());
                    }
                }
            }
            None => (content, None),
        };

        // 6. Stream blocks.
        let result = self.send_blocks(&mut conn, &identity, &payload).await;
        conn.close().await;
        let blocks = result?;

        info!(file_id = %identity.id, blocks, "upload complete");
        Ok(UploadReceipt {
            file_id: identity.id,
            blocks,
            bytes_sent: payload.len() as u64,
            encrypted: key_path.is_some(),
            key_path,
        })
    }

    async fn send_blocks(
        &self,
        conn: &mut D::Connection,
        identity: &FileIdentity,
        payload: &[u8],
    ) -> Result<u32, ClientError> {
        let blocks = split_blocks(payload, BLOCK_SIZE);
        let total = blocks.total();

        for block in blocks {
            let body = UploadBlockRequest {
                backups: identity.backups,
                file_id: identity.id.clone(),
                block_num: block.index,
                block_size: identity.size_bytes,
                blocks: total,
                file_hash: identity.content_hash.clone(),
                data: block.data.to_vec(),
            };
            let request = Request::new(Method::WriteFile, &body)?;
            let resp = conn.call(request, self.config.timeouts.upload_block).await?;
            if !resp.is_ok() {
                return Err(ClientError::BlockRejected {
                    block: block.index,
                    code: resp.code,
                    message: resp.message,
                });
            }
            debug!(file_id = %identity.id, block = block.index, total, "block acknowledged");
        }

        Ok(total)
    }
}

/// Writes the passphrase to `path`, readable by the owner only.
async fn persist_key(path: &Path, key: &str) -> Result<PathBuf, ClientError> {
    let to_err = |source| ClientError::KeyPersist {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(to_err)?;
    }
    tokio::fs::write(path, key.as_bytes()).await.map_err(to_err)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
            .await
            .map_err(to_err)?;
    }

    debug!(path = %path.display(), "encryption key persisted");
    Ok(path.to_path_buf())
}
