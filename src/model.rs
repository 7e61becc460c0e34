//! Record types flowing through the matching pipeline.
//!
//! The pipeline is a strict one-way chain:
//! `RawPosting -> CanonicalJobRecord -> ScoredCandidate -> RerankedCandidate`.
//! Optional fields stay `Option<T>` throughout; "absent" and "zero" are
//! different facts and downstream ordering depends on the distinction.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::hashing;

/// One facet of the candidate's target roles: a named search configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonaSpec {
    pub name: String,
    pub search_term: String,
    pub max_age_hours: u32,
    pub max_results: u32,
}

impl PersonaSpec {
    pub fn new(
        name: impl Into<String>,
        search_term: impl Into<String>,
        max_age_hours: u32,
        max_results: u32,
    ) -> Self {
        Self {
            name: name.into(),
            search_term: search_term.into(),
            max_age_hours,
            max_results,
        }
    }

    /// A spec is usable when it has a non-empty term and a positive age window.
    pub fn is_valid(&self) -> bool {
        !self.search_term.trim().is_empty() && self.max_age_hours > 0
    }
}

/// Provenance-tagged posting as returned by a single source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPosting {
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub posted_at: Option<NaiveDate>,
    pub source_site: String,
    pub persona_source: String,
    pub search_term_used: String,
}

/// A posting that survived deduplication, carrying its stable identifier.
///
/// Exactly one canonical record exists per stable id within an index
/// lifetime; re-ingesting the same posting resolves to the same id.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalJobRecord {
    pub id: u64,
    pub posting: RawPosting,
}

impl CanonicalJobRecord {
    pub fn from_posting(posting: RawPosting) -> Self {
        let id = hashing::stable_posting_id(&posting);
        Self { id, posting }
    }
}

/// Named components of the heuristic score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreBreakdown {
    pub title: i32,
    pub description: i32,
    pub experience: i32,
    pub cv_bonus: i32,
}

impl ScoreBreakdown {
    pub fn total(&self) -> i32 {
        self.title + self.description + self.experience + self.cv_bonus
    }
}

/// Canonical record annotated with similarity and heuristic scores.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub record: CanonicalJobRecord,
    /// 0-100, derived from embedding cosine distance.
    pub similarity_score: f64,
    pub heuristic_score: i32,
    pub breakdown: ScoreBreakdown,
}

/// Structured judgment extracted from a reasoning-service response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RerankVerdict {
    #[serde(default)]
    pub fit_score: f64,
    #[serde(default)]
    pub is_recommended: bool,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub matching_keywords: BTreeSet<String>,
    #[serde(default)]
    pub missing_keywords: BTreeSet<String>,
}

/// Final pipeline output item.
///
/// `verdict` is `None` when reranking was skipped or failed for this
/// candidate; sorting then falls back to the pre-rerank scores.
#[derive(Debug, Clone, PartialEq)]
pub struct RerankedCandidate {
    pub scored: ScoredCandidate,
    pub verdict: Option<RerankVerdict>,
}

impl RerankedCandidate {
    pub fn without_verdict(scored: ScoredCandidate) -> Self {
        Self {
            scored,
            verdict: None,
        }
    }

    pub fn is_recommended(&self) -> bool {
        self.verdict.as_ref().is_some_and(|v| v.is_recommended)
    }

    /// Fit score used for ordering; absent verdicts rank as zero here while
    /// the data itself stays absent.
    pub fn fit_score_for_ordering(&self) -> f64 {
        self.verdict.as_ref().map_or(0.0, |v| v.fit_score)
    }
}
