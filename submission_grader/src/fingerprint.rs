//! Content digests used to detect whether a submitted file was edited.

use crate::error::{HarnessError, HarnessResult};
use sha2::{Digest, Sha256};
use std::{fs, path::Path};

/// Lowercase hex SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Digest of the full byte content of the file at `path`.
///
/// Only the content is hashed, so timestamps and permissions never change the result.
pub fn fingerprint(path: &Path) -> HarnessResult<String> {
    let bytes = fs::read(path).map_err(|source| HarnessError::FileAccess {
        path: path.display().to_string(),
        source,
    })?;
    Ok(sha256_hex(&bytes))
}

/// Whether `digest` has the shape of a hex SHA-256 digest.
pub fn is_sha256_hex(digest: &str) -> bool {
    digest.len() == 64 && digest.bytes().all(|b| b.is_ascii_hexdigit())
}
