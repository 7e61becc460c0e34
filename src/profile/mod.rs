//! Candidate profile handling.
//!
//! Loads the free-text profile document, extracts lightweight metadata from
//! it (known skills with importance, target job titles), and derives search
//! personas from those titles. Metadata extraction is best-effort: an empty
//! result falls back to the static persona set, it never fails the run.

pub mod error;

#[cfg(test)]
mod tests;

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info};

use crate::constants::{PROFILE_METADATA_SCAN_LIMIT, PROFILE_SUMMARY_LIMIT};
use crate::embedding::truncate_chars;
use crate::model::PersonaSpec;

pub use error::ProfileError;

/// Suffix excluding seniority levels the candidate is not targeting.
const NEGATIVE_FILTERS: &str = "-Senior -Lead -Manager -Director -Principal";

/// Skills recognized in profile text, with how strongly each should bias
/// description scoring when present.
const SKILL_LEXICON: &[(&str, f32)] = &[
    ("python", 1.0),
    ("sql", 1.0),
    ("data analysis", 0.9),
    ("veri analizi", 0.9),
    ("tableau", 0.85),
    ("powerbi", 0.85),
    ("power bi", 0.85),
    ("react", 0.7),
    ("javascript", 0.7),
    ("project management", 0.6),
];

/// Generic office tooling that says nothing about fit.
const SKILL_BLACKLIST: &[&str] = &[
    "msoffice",
    "microsoftoffice",
    "word",
    "excel",
    "powerpoint",
    "windows",
    "email",
    "internet",
    "computer",
];

const TITLE_LEXICON: &[&str] = &["developer", "analyst", "engineer", "consultant"];

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\W+").expect("non-word pattern is valid"));

/// Skills and titles pulled out of the profile document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileMetadata {
    pub skills: Vec<String>,
    /// Parallel to `skills`; 0.0..=1.0.
    pub skill_importance: Vec<f32>,
    pub target_titles: Vec<String>,
}

impl ProfileMetadata {
    /// True when extraction found nothing usable for persona derivation.
    pub fn is_empty(&self) -> bool {
        self.target_titles.is_empty()
    }
}

/// Reads and validates the profile document.
pub fn load_profile(path: &Path) -> Result<String, ProfileError> {
    if !path.exists() {
        return Err(ProfileError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let text = std::fs::read_to_string(path).map_err(|e| ProfileError::Unreadable {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    if text.trim().is_empty() {
        return Err(ProfileError::Empty {
            path: path.to_path_buf(),
        });
    }

    info!(path = %path.display(), chars = text.len(), "profile document loaded");
    Ok(text)
}

/// The leading slice of the profile used as rerank prompt context.
pub fn profile_summary(text: &str) -> String {
    truncate_chars(text.trim(), PROFILE_SUMMARY_LIMIT).to_string()
}

/// Scans the document head for known skills and target titles.
pub fn extract_metadata(text: &str) -> ProfileMetadata {
    let window = truncate_chars(text, PROFILE_METADATA_SCAN_LIMIT).to_lowercase();

    let mut metadata = ProfileMetadata::default();
    let mut seen = Vec::new();
    for (skill, importance) in SKILL_LEXICON {
        if !window.contains(skill) {
            continue;
        }
        // Squashed form catches alternate spellings ("power bi" / "powerbi")
        // and drives the blacklist; the skill itself keeps its spelling so
        // the scorer's word-boundary patterns can match it.
        let squashed: String = skill.chars().filter(|c| !c.is_whitespace() && *c != '-').collect();
        if SKILL_BLACKLIST.contains(&squashed.as_str())
            || squashed.chars().count() <= 2
            || seen.contains(&squashed)
        {
            continue;
        }
        seen.push(squashed);
        metadata.skills.push((*skill).to_string());
        metadata.skill_importance.push(*importance);
    }

    for title in TITLE_LEXICON {
        if window.contains(title) {
            metadata.target_titles.push(title_case(title));
        }
    }

    debug!(
        skills = metadata.skills.len(),
        titles = metadata.target_titles.len(),
        "profile metadata extracted"
    );
    metadata
}

/// Builds one persona per target title: a sanitized name plus a quoted
/// search term that filters out senior-track postings.
pub fn build_dynamic_personas(
    titles: &[String],
    max_age_hours: u32,
    max_results: u32,
) -> Vec<PersonaSpec> {
    titles
        .iter()
        .filter_map(|title| {
            let name = NON_WORD.replace_all(title, "_");
            let name = name.trim_matches('_');
            if name.is_empty() {
                return None;
            }
            let term = format!("(\"{title}\") {NEGATIVE_FILTERS}");
            Some(PersonaSpec::new(name, term, max_age_hours, max_results))
        })
        .collect()
}

/// Fallback persona set used when no titles could be extracted.
pub fn default_personas(max_age_hours: u32, max_results: u32) -> Vec<PersonaSpec> {
    [
        ("data_analyst", "\"Data Analyst\""),
        ("business_analyst", "\"Business Analyst\""),
        ("bi_specialist", "\"Business Intelligence\""),
    ]
    .into_iter()
    .map(|(name, quoted)| {
        PersonaSpec::new(
            name,
            format!("({quoted}) {NEGATIVE_FILTERS}"),
            max_age_hours,
            max_results,
        )
    })
    .collect()
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
