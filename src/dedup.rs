//! Cross-source deduplication of collected postings.
//!
//! Pure and order-preserving: the first occurrence of each composite key
//! wins. Recency-based resolution across runs happens implicitly later,
//! because the vector index is keyed by stable identifier rather than by
//! this fuzzy composite key.

use std::collections::HashSet;

use tracing::debug;

use crate::hashing::{description_prefix, normalize};
use crate::model::{CanonicalJobRecord, RawPosting};

/// Composite identity used within a single merge.
///
/// When a description is present, its normalized 100-char prefix
/// participates; otherwise the key degrades to title/company/location.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct DedupKey {
    title: String,
    company: String,
    location: String,
    description_prefix: Option<String>,
}

impl DedupKey {
    fn of(posting: &RawPosting) -> Self {
        Self {
            title: normalize(&posting.title),
            company: normalize(&posting.company),
            location: normalize(posting.location.as_deref().unwrap_or_default()),
            description_prefix: posting.description.as_deref().map(description_prefix),
        }
    }
}

/// Merges per-persona batches into canonical records, dropping duplicates.
///
/// Empty input yields empty output, never an error.
pub fn merge_batches(batches: Vec<Vec<RawPosting>>) -> Vec<CanonicalJobRecord> {
    let before: usize = batches.iter().map(Vec::len).sum();

    let mut seen = HashSet::new();
    let mut canonical = Vec::new();
    for posting in batches.into_iter().flatten() {
        if seen.insert(DedupKey::of(&posting)) {
            canonical.push(CanonicalJobRecord::from_posting(posting));
        }
    }

    debug!(
        before,
        after = canonical.len(),
        removed = before - canonical.len(),
        "merged persona batches"
    );

    canonical
}
