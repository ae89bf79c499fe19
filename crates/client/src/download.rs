//! Download flow: pull a file block by block from a scheduler.

use std::path::PathBuf;

use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use portal_chain::MetadataBridge;
use portal_protocol::constants::Method;
use portal_protocol::envelope::Request;
use portal_protocol::messages::{DownloadBlockRequest, DownloadBlockResponse};
use portal_scheduler::{Dialer, SchedulerConnection, connect_first};
use portal_transfer::{BlockSequence, decrypt, validate_file_name};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::passphrase::PassphraseSource;
use crate::types::DownloadReceipt;

/// Runs downloads against one bridge and one dialer.
pub struct Downloader<'a, D: Dialer> {
    config: &'a ClientConfig,
    bridge: &'a dyn MetadataBridge,
    dialer: &'a D,
}

impl<'a, D: Dialer> Downloader<'a, D> {
    pub fn new(config: &'a ClientConfig, bridge: &'a dyn MetadataBridge, dialer: &'a D) -> Self {
        Self {
            config,
            bridge,
            dialer,
        }
    }

    /// Downloads `file_id` into the install directory.
    ///
    /// Blocks are requested from index 1 until the scheduler returns the
    /// last one. A failure mid-transfer leaves the partial file on disk.
    /// Private files are decrypted in place once complete; `passphrase` is
    /// only consulted for those.
    pub async fn download(
        &self,
        file_id: &str,
        passphrase: &dyn PassphraseSource,
    ) -> Result<DownloadReceipt, ClientError> {
        // 1. Check the record.
        let record = self.bridge.file_info(file_id).await?;
        if record.name.is_empty() {
            return Err(ClientError::FileNotFound(file_id.to_string()));
        }
        if !record.state.is_active() {
            return Err(ClientError::FileNotReady {
                file_id: file_id.to_string(),
                state: record.state.to_string(),
            });
        }
        validate_file_name(&record.name)?;

        // 2. Prepare the destination.
        tokio::fs::create_dir_all(&self.config.install_dir).await?;
        let dest: PathBuf = self.config.install_dir.join(&record.name);
        let mut file = tokio::fs::File::create(&dest).await?;
        info!(file_id, dest = %dest.display(), public = record.is_public, "starting download");

        // 3. Pick a scheduler.
        let endpoints = self.bridge.list_schedulers().await?;
        if endpoints.is_empty() {
            return Err(ClientError::NoSchedulersConfigured);
        }
        let mut conn =
            connect_first(self.dialer, &endpoints, self.config.timeouts.download_connect).await?;

        // 4. Pull blocks.
        let result = self.receive_blocks(&mut conn, file_id, &mut file).await;
        conn.close().await;
        let flushed = file.flush().await;
        drop(file);
        let (blocks, mut bytes_written) = result?;
        flushed?;

        // 5. Decrypt private files in place.
        let decrypted = !record.is_public;
        if decrypted {
            let pass = passphrase.passphrase(&record.name)?;
            let ciphertext = tokio::fs::read(&dest).await?;
            let plaintext = match decrypt(&ciphertext, &pass) {
                Ok(p) => p,
                Err(e) => {
                    warn!(file_id, dest = %dest.display(), "decryption failed, ciphertext kept");
                    return Err(e.into());
                }
            };
            tokio::fs::write(&dest, &plaintext).await?;
            bytes_written = plaintext.len() as u64;
        }

        info!(file_id, blocks, bytes = bytes_written, "download complete");
        Ok(DownloadReceipt {
            path: dest,
            blocks,
            bytes_written,
            decrypted,
        })
    }

    /// Requests blocks in order and appends them to `file`.
    ///
    /// Returns the number of blocks and bytes written.
    async fn receive_blocks(
        &self,
        conn: &mut D::Connection,
        file_id: &str,
        file: &mut tokio::fs::File,
    ) -> Result<(u32, u64), ClientError> {
        let mut sequence = BlockSequence::new();
        let mut written = 0u64;

        loop {
            let index = sequence.next_index();
            let body = DownloadBlockRequest {
                file_id: file_id.to_string(),
                wallet_address: self.config.wallet_address.clone(),
                block_num: index,
            };
            let request = Request::new(Method::ReadFile, &body)?;
            let resp = conn
                .call(request, self.config.timeouts.download_block)
                .await?;
            if !resp.is_ok() {
                return Err(ClientError::BlockRejected {
                    block: index,
                    code: resp.code,
                    message: resp.message,
                });
            }

            let block: DownloadBlockResponse = resp.parse_data()?;
            let last = sequence.accept(block.block_num, block.blocks)?;
            file.write_all(&block.data).await?;
            written += block.data.len() as u64;
            debug!(file_id, block = block.block_num, total = block.blocks, "block received");

            if last {
                return Ok((sequence.received(), written));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::passphrase::StaticPassphrase;
    use crate::tests_support::{Event, MockBridge, MockDialer, Reply, block_reply};
    use portal_protocol::envelope::Response;
    use portal_protocol::types::{FileRecord, FileState};
    use portal_transfer::{TransferError, encrypt};
    use tempfile::TempDir;

    fn config(dir: &TempDir) -> ClientConfig {
        ClientConfig::new(dir.path().join("files"), dir.path().join("keys"), "cXwallet")
    }

    fn record(id: &str, name: &str, state: FileState, is_public: bool) -> FileRecord {
        FileRecord {
            id: id.into(),
            name: name.into(),
            state,
            is_public,
            hash: String::new(),
            backups: 3,
            size_kb: 1,
        }
    }

    fn no_pass() -> StaticPassphrase {
        StaticPassphrase::new("")
    }

    #[tokio::test]
    async fn three_blocks_three_responses() {
        let dir = TempDir::new().unwrap();
        let cfg = config(&dir);
        let bridge = MockBridge::with_schedulers(&["a:1"])
            .with_file(record("f1", "out.bin", FileState::Active, true));
        let dialer = MockDialer::new(vec![
            block_reply(1, 3, b"aaaa"),
            block_reply(2, 3, b"bbbb"),
            block_reply(3, 3, b"cc"),
            block_reply(4, 3, b"never"),
        ]);

        let receipt = Downloader::new(&cfg, &bridge, &dialer)
            .download("f1", &no_pass())
            .await
            .unwrap();

        assert_eq!(receipt.blocks, 3);
        assert_eq!(receipt.bytes_written, 10);
        assert!(!receipt.decrypted);
        assert_eq!(receipt.path, cfg.install_dir.join("out.bin"));
        assert_eq!(std::fs::read(&receipt.path).unwrap(), b"aaaabbbbcc");

        let requests = dialer.requests();
        assert_eq!(requests.len(), 3);
        for (i, r) in requests.iter().enumerate() {
            assert_eq!(r.method, Method::ReadFile);
            let body: DownloadBlockRequest = r.parse_body().unwrap();
            assert_eq!(body.block_num, i as u32 + 1);
            assert_eq!(body.file_id, "f1");
            assert_eq!(body.wallet_address, "cXwallet");
        }
        assert!(dialer.closed());
    }

    #[tokio::test]
    async fn changing_total_is_protocol_error() {
        let dir = TempDir::new().unwrap();
        let cfg = config(&dir);
        let bridge = MockBridge::with_schedulers(&["a:1"])
            .with_file(record("f1", "out.bin", FileState::Active, true));
        let dialer = MockDialer::new(vec![block_reply(1, 3, b"a"), block_reply(2, 4, b"b")]);

        let err = Downloader::new(&cfg, &bridge, &dialer)
            .download("f1", &no_pass())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ClientError::Sequence(TransferError::TotalBlocksChanged {
                expected: 3,
                got: 4
            })
        ));
        assert_eq!(err.kind(), ErrorKind::Protocol);
        // Partial content stays on disk.
        assert_eq!(std::fs::read(cfg.install_dir.join("out.bin")).unwrap(), b"a");
    }

    #[tokio::test]
    async fn wrong_block_index_is_protocol_error() {
        let dir = TempDir::new().unwrap();
        let cfg = config(&dir);
        let bridge = MockBridge::with_schedulers(&["a:1"])
            .with_file(record("f1", "out.bin", FileState::Active, true));
        let dialer = MockDialer::new(vec![block_reply(2, 3, b"a")]);

        let err = Downloader::new(&cfg, &bridge, &dialer)
            .download("f1", &no_pass())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Protocol);
    }

    #[tokio::test]
    async fn zero_total_is_protocol_error() {
        let dir = TempDir::new().unwrap();
        let cfg = config(&dir);
        let bridge = MockBridge::with_schedulers(&["a:1"])
            .with_file(record("f1", "out.bin", FileState::Active, true));
        let dialer = MockDialer::new(vec![block_reply(1, 0, b"")]);

        let err = Downloader::new(&cfg, &bridge, &dialer)
            .download("f1", &no_pass())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Protocol);
    }

    #[tokio::test]
    async fn rejected_block_aborts() {
        let dir = TempDir::new().unwrap();
        let cfg = config(&dir);
        let bridge = MockBridge::with_schedulers(&["a:1"])
            .with_file(record("f1", "out.bin", FileState::Active, true));
        let dialer = MockDialer::new(vec![
            block_reply(1, 2, b"a"),
            Reply::Ok(Response::error(0, 4, "block missing")),
        ]);

        let err = Downloader::new(&cfg, &bridge, &dialer)
            .download("f1", &no_pass())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::BlockRejected { block: 2, code: 4, .. }));
    }

    #[tokio::test]
    async fn timeout_is_transport_error() {
        let dir = TempDir::new().unwrap();
        let cfg = config(&dir);
        let bridge = MockBridge::with_schedulers(&["a:1"])
            .with_file(record("f1", "out.bin", FileState::Active, true));
        let dialer = MockDialer::new(vec![Reply::Timeout]);

        let err = Downloader::new(&cfg, &bridge, &dialer)
            .download("f1", &no_pass())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[tokio::test]
    async fn pending_file_is_not_ready_and_never_dials() {
        let dir = TempDir::new().unwrap();
        let cfg = config(&dir);
        let bridge = MockBridge::with_schedulers(&["a:1"])
            .with_file(record("f1", "out.bin", FileState::Pending, true));
        let dialer = MockDialer::new(vec![]);

        let err = Downloader::new(&cfg, &bridge, &dialer)
            .download("f1", &no_pass())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotReady);
        assert!(dialer.dialed().is_empty());
        assert!(!cfg.install_dir.join("out.bin").exists());
    }

    #[tokio::test]
    async fn unknown_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let cfg = config(&dir);
        let bridge = MockBridge::with_schedulers(&["a:1"]);
        let dialer = MockDialer::new(vec![]);

        let err = Downloader::new(&cfg, &bridge, &dialer)
            .download("missing", &no_pass())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::FileNotFound(ref id) if id == "missing"));
    }

    #[tokio::test]
    async fn empty_name_is_not_found() {
        let dir = TempDir::new().unwrap();
        let cfg = config(&dir);
        let bridge = MockBridge::with_schedulers(&["a:1"])
            .with_file(record("f1", "", FileState::Active, true));
        let dialer = MockDialer::new(vec![]);

        let err = Downloader::new(&cfg, &bridge, &dialer)
            .download("f1", &no_pass())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::FileNotFound(_)));
    }

    #[tokio::test]
    async fn traversal_name_is_rejected() {
        let dir = TempDir::new().unwrap();
        let cfg = config(&dir);
        let bridge = MockBridge::with_schedulers(&["a:1"])
            .with_file(record("f1", "../escape", FileState::Active, true));
        let dialer = MockDialer::new(vec![]);

        let err = Downloader::new(&cfg, &bridge, &dialer)
            .download("f1", &no_pass())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidPath(_)));
        assert!(!dir.path().join("escape").exists());
    }

    #[tokio::test]
    async fn private_file_is_decrypted_in_place() {
        let dir = TempDir::new().unwrap();
        let cfg = config(&dir);
        let plain = b"top secret content".repeat(100);
        let cipher = encrypt(&plain, "hunter2").unwrap();
        let (first, second) = cipher.split_at(cipher.len() / 2);

        let bridge = MockBridge::with_schedulers(&["a:1"])
            .with_file(record("f1", "secret.doc", FileState::Active, false));
        let dialer = MockDialer::new(vec![block_reply(1, 2, first), block_reply(2, 2, second)]);

        let receipt = Downloader::new(&cfg, &bridge, &dialer)
            .download("f1", &StaticPassphrase::new("hunter2"))
            .await
            .unwrap();

        assert!(receipt.decrypted);
        assert_eq!(receipt.bytes_written, plain.len() as u64);
        assert_eq!(std::fs::read(&receipt.path).unwrap(), plain);
    }

    #[tokio::test]
    async fn wrong_passphrase_keeps_ciphertext() {
        let dir = TempDir::new().unwrap();
        let cfg = config(&dir);
        let cipher = encrypt(b"hello", "right").unwrap();

        let bridge = MockBridge::with_schedulers(&["a:1"])
            .with_file(record("f1", "secret.doc", FileState::Active, false));
        let dialer = MockDialer::new(vec![block_reply(1, 1, &cipher)]);

        let err = Downloader::new(&cfg, &bridge, &dialer)
            .download("f1", &StaticPassphrase::new("wrong"))
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::DecryptionFailed));
        assert_eq!(err.kind(), ErrorKind::Crypto);
        assert_eq!(
            std::fs::read(cfg.install_dir.join("secret.doc")).unwrap(),
            cipher
        );
    }

    #[tokio::test]
    async fn consults_chain_before_dialing() {
        let dir = TempDir::new().unwrap();
        let cfg = config(&dir);
        let bridge = MockBridge::with_schedulers(&["a:1", "b:2"])
            .with_file(record("f1", "out.bin", FileState::Active, true));
        let dialer = MockDialer::new(vec![block_reply(1, 1, b"x")]).sharing_log(bridge.log());

        Downloader::new(&cfg, &bridge, &dialer)
            .download("f1", &no_pass())
            .await
            .unwrap();

        assert_eq!(dialer.dialed(), vec!["a:1"]);
        let events = bridge.events();
        assert_eq!(events[0], Event::FileInfo);
        assert!(events.contains(&Event::Close));
    }
}
