//! Terminal passphrase prompt for private downloads.

use portal_client::{ClientError, PassphraseSource};

/// Reads the passphrase from the terminal without echo.
pub struct TerminalPassphrase;

impl PassphraseSource for TerminalPassphrase {
    fn passphrase(&self, file_name: &str) -> Result<String, ClientError> {
        rpassword::prompt_password(format!("Passphrase for {file_name}: "))
            .map_err(|e| ClientError::Passphrase(e.to_string()))
    }
}
