use sha2::{Digest, Sha256};

use bujo_types::EntryRef;

/// Width of a generated ref in hex characters.
pub const REF_WIDTH: usize = 6;

/// Generate a short stable reference for an entry.
///
/// Deterministic over (source file, content, context key); the context key is
/// the entry date for dated files, empty otherwise, and gains a line-number
/// salt when the indexer hits a collision. Truncation makes collisions
/// possible; the store arbitrates uniqueness.
pub fn entry_ref(source_file: &str, content: &str, context_key: &str) -> EntryRef {
    let mut hasher = Sha256::new();
    hasher.update(source_file.as_bytes());
    hasher.update(b":");
    hasher.update(content.as_bytes());
    hasher.update(b":");
    hasher.update(context_key.as_bytes());

    let digest = format!("{:x}", hasher.finalize());
    EntryRef::new(&digest[..REF_WIDTH])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generates_fixed_width() {
        let r = entry_ref("daily/2024-12-03.md", "Test content", "2024-12-03");
        assert_eq!(r.as_str().len(), REF_WIDTH);
        assert!(r.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_deterministic() {
        let a = entry_ref("daily/2024-12-03.md", "Test content", "2024-12-03");
        let b = entry_ref("daily/2024-12-03.md", "Test content", "2024-12-03");
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_content_different_ref() {
        let a = entry_ref("daily/2024-12-03.md", "Content A", "2024-12-03");
        let b = entry_ref("daily/2024-12-03.md", "Content B", "2024-12-03");
        assert_ne!(a, b);
    }

    #[test]
    fn test_different_file_different_ref() {
        let a = entry_ref("daily/2024-12-03.md", "Same content", "2024-12-03");
        let b = entry_ref("daily/2024-12-04.md", "Same content", "2024-12-04");
        assert_ne!(a, b);
    }

    #[test]
    fn test_salted_key_changes_ref() {
        let plain = entry_ref("future.md", "Same line", "");
        let salted = entry_ref("future.md", "Same line", ":4");
        assert_ne!(plain, salted);
    }
}
