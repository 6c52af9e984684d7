use sha2::{Digest, Sha256};
use std::path::Path;

/// Hex-encoded SHA-256 of a byte slice.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Hex-encoded SHA-256 of a file's contents, or `None` if it can't be read.
pub fn sha256_file(path: &Path) -> Option<String> {
    std::fs::read(path).ok().map(|data| sha256_hex(&data))
}

/// Longest slice of runner output quoted inside an error message.
pub const ERROR_SNIPPET_BYTES: usize = 500;

/// Clip `s` to at most [`ERROR_SNIPPET_BYTES`], backing off to a char boundary.
pub fn clip_for_error(s: &str) -> &str {
    let limit = ERROR_SNIPPET_BYTES.min(s.len());
    let end = (0..=limit)
        .rev()
        .find(|&i| s.is_char_boundary(i))
        .unwrap_or(0);
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_value() {
        assert_eq!(
            sha256_hex(b"test content"),
            "6ae8a75555209fd6c44157c0aed8016e763ff435a19cf186f76863140143ff72"
        );
    }

    #[test]
    fn test_sha256_file_matches_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.txt");
        std::fs::write(&path, b"test content").unwrap();
        assert_eq!(sha256_file(&path), Some(sha256_hex(b"test content")));
    }

    #[test]
    fn test_sha256_file_missing() {
        assert_eq!(sha256_file(Path::new("/non/existent/file")), None);
    }

    #[test]
    fn test_clip_short_untouched() {
        assert_eq!(clip_for_error("short"), "short");
    }

    #[test]
    fn test_clip_respects_char_boundary() {
        let s = "é".repeat(400); // 800 bytes, 2 per char
        let t = clip_for_error(&s);
        assert_eq!(t.len(), ERROR_SNIPPET_BYTES);
        assert!(t.chars().all(|c| c == 'é'));
    }
}

