use sha2::{Digest, Sha256};
use std::path::Path;

/// SHA-256 digest of a byte slice, lowercase hex.
pub fn hash_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Hash a file's content for change detection.
///
/// A non-existent file hashes to the empty string, so "missing" and "present"
/// share one representation and deletions are detectable by comparison.
pub fn hash_file(path: &Path) -> std::io::Result<String> {
    if !path.exists() {
        return Ok(String::new());
    }
    let content = std::fs::read(path)?;
    Ok(hash_bytes(&content))
}
