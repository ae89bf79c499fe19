use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::TransferError;

/// Length of the random nonce prefixed to every ciphertext.
pub const NONCE_LEN: usize = 12;

/// Derives the AES-256 key from a passphrase: SHA-256 of its bytes.
fn derive_key(passphrase: &str) -> Result<[u8; 32], TransferError> {
    if passphrase.is_empty() {
        return Err(TransferError::EmptyKey);
    }
    let mut key = [0u8; 32];
    key.copy_from_slice(&Sha256::digest(passphrase.as_bytes()));
    Ok(key)
}

/// Encrypts `plaintext` with AES-256-GCM under `passphrase`.
///
/// Output: `[nonce(12)][ciphertext + 16-byte tag]`.
pub fn encrypt(plaintext: &[u8], passphrase: &str) -> Result<Vec<u8>, TransferError> {
    let key = derive_key(passphrase)?;
    let cipher = Aes256Gcm::new((&key).into());

    let mut nonce_bytes = [0u8; NONCE_LEN];
    rand::thread_rng().fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|_| TransferError::EncryptionFailed)?;

    let mut output = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    output.extend_from_slice(&nonce_bytes);
    output.extend_from_slice(&ciphertext);
    Ok(output)
}

/// Decrypts data produced by [`encrypt`].
pub fn decrypt(data: &[u8], passphrase: &str) -> Result<Vec<u8>, TransferError> {
    let key = derive_key(passphrase)?;
    if data.len() < NONCE_LEN {
        return Err(TransferError::DecryptionFailed);
    }

    let cipher = Aes256Gcm::new((&key).into());
    let (nonce, ciphertext) = data.split_at(NONCE_LEN);
    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| TransferError::DecryptionFailed)
}
