use regex::Regex;
use tracing::debug;

use crate::constants::SCORING_DESCRIPTION_LIMIT;
use crate::model::{CanonicalJobRecord, ScoreBreakdown};

use super::config::ScoringConfig;
use super::error::ScoringError;

/// Pure, side-effect-free heuristic scorer.
///
/// All patterns are compiled once at construction; scoring itself never
/// fails and never performs I/O. Empty or absent text contributes zero.
pub struct ScoringEngine {
    positive_weight: i32,
    negative_weight: i32,
    threshold: i32,
    title_positive: Vec<Regex>,
    title_negative: Vec<Regex>,
    description_positive: Vec<(Regex, i32)>,
    description_negative: Vec<(Regex, i32)>,
    /// Sorted descending by threshold so the first match is the highest met.
    experience_penalties: Vec<(u32, i32)>,
    experience_pattern: Regex,
    cv_skill_boost_threshold: f32,
    cv_skill_bonus_points: i32,
    profile_embedding: Option<Vec<f32>>,
}

impl std::fmt::Debug for ScoringEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoringEngine")
            .field("threshold", &self.threshold)
            .field("title_positive", &self.title_positive.len())
            .field("title_negative", &self.title_negative.len())
            .field("description_positive", &self.description_positive.len())
            .field("description_negative", &self.description_negative.len())
            .finish()
    }
}

impl ScoringEngine {
    pub fn new(config: &ScoringConfig) -> Result<Self, ScoringError> {
        let mut experience_penalties = config.experience_penalties.clone();
        experience_penalties.sort_by(|a, b| b.0.cmp(&a.0));

        Ok(Self {
            positive_weight: config.positive_weight,
            negative_weight: config.negative_weight,
            threshold: config.threshold,
            title_positive: compile_list(&config.title_positive)?,
            title_negative: compile_list(&config.title_negative)?,
            description_positive: compile_weighted(&config.description_positive)?,
            description_negative: compile_weighted(&config.description_negative)?,
            experience_penalties,
            // Turkish and English year variants, optional trailing "+".
            experience_pattern: Regex::new(r"(?i)(\d+)\+?\s*(y[ıi]l|sene|yrs?|years?)")
                .expect("experience pattern is a valid regex"),
            cv_skill_boost_threshold: config.cv_skill_boost_threshold,
            cv_skill_bonus_points: config.cv_skill_bonus_points,
            profile_embedding: None,
        })
    }

    /// Enables the embedding-similarity bonus against this profile vector.
    pub fn with_profile_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.profile_embedding = Some(embedding);
        self
    }

    pub fn threshold(&self) -> i32 {
        self.threshold
    }

    /// Sums matched positive/negative title keywords.
    pub fn score_title(&self, title: &str) -> i32 {
        if title.is_empty() {
            return 0;
        }
        let mut score = 0;
        for pattern in &self.title_negative {
            if pattern.is_match(title) {
                score += self.negative_weight;
            }
        }
        for pattern in &self.title_positive {
            if pattern.is_match(title) {
                score += self.positive_weight;
            }
        }
        score
    }

    /// Sums matched weighted description keywords over the first 3000 chars.
    pub fn score_description(&self, description: &str) -> i32 {
        if description.is_empty() {
            return 0;
        }
        let text = truncate_chars(description, SCORING_DESCRIPTION_LIMIT);
        let mut score = 0;
        for (pattern, weight) in &self.description_positive {
            if pattern.is_match(text) {
                score += weight;
            }
        }
        for (pattern, weight) in &self.description_negative {
            if pattern.is_match(text) {
                score += weight;
            }
        }
        score
    }

    /// Extracts required experience years and applies the penalty for the
    /// highest threshold not exceeding the maximum years found.
    pub fn score_experience(&self, text: &str) -> i32 {
        if text.is_empty() {
            return 0;
        }
        let years = self
            .experience_pattern
            .captures_iter(text)
            .filter_map(|c| c.get(1).and_then(|m| m.as_str().parse::<u32>().ok()))
            .max();

        let Some(years) = years else {
            return 0;
        };

        for &(threshold, penalty) in &self.experience_penalties {
            if years >= threshold {
                debug!(years, penalty, "experience penalty applied");
                return penalty;
            }
        }
        0
    }

    /// Scores a canonical record, returning the total and its breakdown.
    ///
    /// `job_embedding` is the posting's own embedding when available; the
    /// bonus applies only when its cosine similarity to the profile meets
    /// the boost threshold.
    pub fn score(
        &self,
        record: &CanonicalJobRecord,
        job_embedding: Option<&[f32]>,
    ) -> (i32, ScoreBreakdown) {
        let description = record.posting.description.as_deref().unwrap_or_default();
        let breakdown = ScoreBreakdown {
            title: self.score_title(&record.posting.title),
            description: self.score_description(description),
            experience: self.score_experience(description),
            cv_bonus: self.cv_bonus(job_embedding),
        };
        let total = breakdown.total();
        debug!(
            title = %record.posting.title,
            total,
            title_score = breakdown.title,
            description_score = breakdown.description,
            experience_score = breakdown.experience,
            cv_bonus = breakdown.cv_bonus,
            "scored posting"
        );
        (total, breakdown)
    }

    pub fn should_include(&self, score: i32) -> bool {
        score >= self.threshold
    }

    fn cv_bonus(&self, job_embedding: Option<&[f32]>) -> i32 {
        let (Some(job), Some(profile)) = (job_embedding, self.profile_embedding.as_deref()) else {
            return 0;
        };
        if cosine_similarity(job, profile) >= self.cv_skill_boost_threshold {
            self.cv_skill_bonus_points
        } else {
            0
        }
    }
}

/// Compiles one keyword into a case-insensitive word-boundary pattern.
///
/// Hyphens and spaces are interchangeable separators: "full-stack" matches
/// "full stack" and vice versa. Word boundaries prevent partial-word hits
/// ("Seniority" must not match "Senior").
fn keyword_pattern(keyword: &str) -> Result<Regex, ScoringError> {
    let parts: Vec<String> = keyword
        .trim()
        .split(|c: char| c == '-' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .map(regex::escape)
        .collect();
    let body = parts.join(r"[\s-]+");
    Regex::new(&format!(r"(?i)\b{body}\b")).map_err(|e| ScoringError::InvalidPattern {
        keyword: keyword.to_string(),
        message: e.to_string(),
    })
}

fn compile_list(items: &[String]) -> Result<Vec<Regex>, ScoringError> {
    let mut patterns = Vec::new();
    for item in items {
        for part in item.split(',') {
            let part = part.trim();
            if !part.is_empty() {
                patterns.push(keyword_pattern(part)?);
            }
        }
    }
    Ok(patterns)
}

fn compile_weighted(items: &[(String, i32)]) -> Result<Vec<(Regex, i32)>, ScoringError> {
    let mut patterns = Vec::new();
    for (item, weight) in items {
        for part in item.split(',') {
            let part = part.trim();
            if !part.is_empty() {
                patterns.push((keyword_pattern(part)?, *weight));
            }
        }
    }
    Ok(patterns)
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
