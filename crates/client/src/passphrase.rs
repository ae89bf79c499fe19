//! Source of decryption passphrases for private downloads.

use crate::ClientError;

/// Supplies the passphrase for a private file once all its blocks are on disk.
pub trait PassphraseSource: Send + Sync {
    fn passphrase(&self, file_name: &str) -> Result<String, ClientError>;
}

/// Returns a fixed passphrase.
#[derive(Debug, Clone)]
pub struct StaticPassphrase(String);

impl StaticPassphrase {
    pub fn new(passphrase: impl Into<String>) -> Self {
        Self(passphrase.into())
    }
}

impl PassphraseSource for StaticPassphrase {
    fn passphrase(&self, _file_name: &str) -> Result<String, ClientError> {
        Ok(self.0.clone())
    }
}
