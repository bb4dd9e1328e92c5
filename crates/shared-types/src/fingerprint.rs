//! Content-addressed fingerprints for rule text

use sha2::{Digest, Sha256};

/// Case-fold and collapse all runs of whitespace to a single space
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalize an externally supplied hash so equal digests compare equal
pub fn normalize_hash(hash: &str) -> String {
    hash.trim().to_lowercase()
}

/// SHA-256 (hex) of the normalized title and content.
///
/// Two rules whose text differs only in case or spacing share a fingerprint.
pub fn content_fingerprint(title: &str, content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalize_text(title).as_bytes());
    hasher.update(b"\n");
    hasher.update(normalize_text(content).as_bytes());
    hex::encode(hasher.finalize())
}

/// Deterministic identifier derived from a prefix and identifying parts
pub fn stable_id(prefix: &str, parts: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(normalize_text(part).as_bytes());
        hasher.update(b"\x1f");
    }
    let digest = hex::encode(hasher.finalize());
    format!("{}-{}", prefix, &digest[..16])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text() {
        assert_eq!(
            normalize_text("  Register   for\tState\nPayroll Taxes "),
            "register for state payroll taxes"
        );
        assert_eq!(normalize_text(""), "");
    }

    #[test]
    fn test_fingerprint_ignores_case_and_spacing() {
        let a = content_fingerprint("Form 941", "File quarterly  federal payroll returns.");
        let b = content_fingerprint("FORM 941 ", "file quarterly federal\npayroll returns.");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_fingerprint_separates_title_from_content() {
        let a = content_fingerprint("ab", "c");
        let b = content_fingerprint("a", "bc");
        assert_ne!(a, b);
    }

    #[test]
    fn test_stable_id_is_deterministic() {
        let a = stable_id("ai", &["Seller's Permit", "CDTFA"]);
        let b = stable_id("ai", &["seller's  permit", "cdtfa"]);
        assert_eq!(a, b);
        assert!(a.starts_with("ai-"));
        assert_eq!(a.len(), "ai-".len() + 16);
    }
}
