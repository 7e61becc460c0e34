//! BLAKE3 content hashing for stable posting identifiers.
//!
//! The vector index is keyed by a content-derived u64. Postings with a URL
//! hash the trimmed URL; postings without one hash the same normalized
//! composite fields the deduplicator keys on, so both stages share a single
//! identity notion.

use blake3::Hasher;

use crate::constants::DEDUP_DESCRIPTION_PREFIX;
use crate::model::RawPosting;

/// Computes a 64-bit hash of the input, truncated from BLAKE3's 256 bits.
///
/// 64 bits is plenty for the collection sizes this system sees (thousands of
/// postings per index lifetime); a collision degrades to one skipped insert,
/// not data corruption.
#[inline]
pub fn hash_to_u64(data: &[u8]) -> u64 {
    let hash = blake3::hash(data);
    let bytes: [u8; 8] = hash.as_bytes()[0..8]
        .try_into()
        .expect("BLAKE3 always produces at least 8 bytes");
    u64::from_le_bytes(bytes)
}

/// Stable, idempotency-grade identifier for a posting.
///
/// Re-scraping the same posting on a later run must resolve to the same id.
pub fn stable_posting_id(posting: &RawPosting) -> u64 {
    if let Some(url) = posting.url.as_deref() {
        let url = url.trim();
        if !url.is_empty() {
            return hash_to_u64(url.as_bytes());
        }
    }
    hash_composite(posting)
}

fn hash_composite(posting: &RawPosting) -> u64 {
    let mut hasher = Hasher::new();
    hasher.update(normalize(&posting.title).as_bytes());
    hasher.update(b"|");
    hasher.update(normalize(&posting.company).as_bytes());
    hasher.update(b"|");
    hasher.update(normalize(posting.location.as_deref().unwrap_or_default()).as_bytes());
    hasher.update(b"|");
    if let Some(description) = posting.description.as_deref() {
        hasher.update(description_prefix(description).as_bytes());
    }

    let hash = hasher.finalize();
    let bytes: [u8; 8] = hash.as_bytes()[0..8]
        .try_into()
        .expect("BLAKE3 always produces at least 8 bytes");
    u64::from_le_bytes(bytes)
}

/// Lower-cased, whitespace-trimmed form used by dedup keys and composite ids.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Normalized first-100-characters description prefix (char-boundary safe).
pub fn description_prefix(description: &str) -> String {
    normalize(description)
        .chars()
        .take(DEDUP_DESCRIPTION_PREFIX)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawPosting;

    fn posting(url: Option<&str>) -> RawPosting {
        RawPosting {
            title: "Jr Data Analyst".to_string(),
            company: "Acme".to_string(),
            location: Some("Istanbul".to_string()),
            description: Some("SQL and Python reporting role".to_string()),
            url: url.map(str::to_string),
            posted_at: None,
            source_site: "indeed".to_string(),
            persona_source: "analyst".to_string(),
            search_term_used: "data analyst".to_string(),
        }
    }

    #[test]
    fn url_hash_is_deterministic() {
        let a = stable_posting_id(&posting(Some("https://example.com/job/1")));
        let b = stable_posting_id(&posting(Some("https://example.com/job/1")));
        assert_eq!(a, b);
    }

    #[test]
    fn url_whitespace_is_trimmed() {
        let a = stable_posting_id(&posting(Some("https://example.com/job/1")));
        let b = stable_posting_id(&posting(Some("  https://example.com/job/1 ")));
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_urls_get_distinct_ids() {
        let a = stable_posting_id(&posting(Some("https://example.com/job/1")));
        let b = stable_posting_id(&posting(Some("https://example.com/job/2")));
        assert_ne!(a, b);
    }

    #[test]
    fn empty_url_falls_back_to_composite() {
        let a = stable_posting_id(&posting(Some("  ")));
        let b = stable_posting_id(&posting(None));
        assert_eq!(a, b);
    }

    #[test]
    fn composite_id_ignores_case_and_padding() {
        let mut shouty = posting(None);
        shouty.title = "  JR DATA ANALYST ".to_string();
        shouty.company = "ACME".to_string();
        assert_eq!(stable_posting_id(&shouty), stable_posting_id(&posting(None)));
    }

    #[test]
    fn composite_id_uses_description_prefix_only() {
        let mut long_a = posting(None);
        let mut long_b = posting(None);
        let prefix = "x".repeat(DEDUP_DESCRIPTION_PREFIX);
        long_a.description = Some(format!("{prefix} tail one"));
        long_b.description = Some(format!("{prefix} tail two"));
        assert_eq!(stable_posting_id(&long_a), stable_posting_id(&long_b));
    }

    #[test]
    fn hash_to_u64_empty_input_is_stable() {
        assert_eq!(hash_to_u64(b""), hash_to_u64(b""));
    }
}
