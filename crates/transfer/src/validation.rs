use std::fs::Metadata;
use std::path::{Component, Path};

use crate::TransferError;

/// Checks that `path` names a regular file and returns its metadata.
///
/// Rejects missing paths, directories and other non-regular entries with
/// [`TransferError::InvalidPath`].
pub fn validate_source_file(path: &Path) -> Result<Metadata, TransferError> {
    let metadata = std::fs::metadata(path).map_err(|e| {
        TransferError::InvalidPath(format!("{}: {e}", path.display()))
    })?;

    if metadata.is_dir() {
        return Err(TransferError::InvalidPath(format!(
            "directories cannot be uploaded: {}",
            path.display()
        )));
    }
    if !metadata.is_file() {
        return Err(TransferError::InvalidPath(format!(
            "not a regular file: {}",
            path.display()
        )));
    }

    Ok(metadata)
}

/// Parses a backup count: a positive integer that fits the chain's `u8`.
pub fn parse_backups(raw: &str) -> Result<u8, TransferError> {
    match raw.trim().parse::<u8>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(TransferError::InvalidBackupCount(raw.to_string())),
    }
}

/// Validates a file name received from the network before it is joined
/// onto a local directory.
///
/// Rejects:
/// - Empty names
/// - Absolute paths (Unix `/` or Windows `C:\`)
/// - Parent directory traversal (`..`) and `.`
/// - Anything with more than one path component
pub fn validate_file_name(name: &str) -> Result<(), TransferError> {
    if name.is_empty() {
        return Err(TransferError::InvalidPath("empty file name".into()));
    }

    let path = Path::new(name);
    if path.is_absolute() {
        return Err(TransferError::InvalidPath(format!(
            "absolute path not allowed: {name}"
        )));
    }

    let mut components = path.components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        (Some(Component::ParentDir), _) | (_, Some(Component::ParentDir)) => {
            Err(TransferError::InvalidPath(format!(
                "parent directory traversal not allowed: {name}"
            )))
        }
        _ => Err(TransferError::InvalidPath(format!(
            "file name must not contain directories: {name}"
        ))),
    }
}
