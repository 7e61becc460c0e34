//! LLM-backed reranking of shortlisted candidates.
//!
//! A bounded worker pool sends one prompt per candidate to a text generation
//! backend and parses the returned JSON verdict. Capacity failures (rate
//! limits, timeouts) and malformed replies degrade the individual candidate
//! to its heuristic standing instead of failing the batch.

pub mod error;
pub mod json;


use std::cmp::Ordering;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use crate::constants::{
    DEFAULT_RERANK_POOL_SIZE, DEFAULT_RERANK_TEMPERATURE, DEFAULT_RERANK_WORKERS,
    RERANK_DESCRIPTION_LIMIT,
};
use crate::embedding::truncate_chars;
use crate::gemini::GeminiClient;
use crate::model::{RerankVerdict, RerankedCandidate, ScoredCandidate};

pub use error::GenerationError;
pub use json::extract_json_object;

/// Text generation backend used for per-candidate assessment.
pub trait Generator: Send + Sync {
    /// Generates a completion for `prompt` at the given temperature.
    fn generate(
        &self,
        prompt: &str,
        temperature: f32,
    ) -> impl std::future::Future<Output = Result<String, GenerationError>> + Send;
}

impl Generator for GeminiClient {
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String, GenerationError> {
        Ok(self.generate_text(prompt, temperature).await?)
    }
}

/// Tunables for the rerank stage.
#[derive(Debug, Clone)]
pub struct RerankerConfig {
    /// Maximum concurrent generation calls.
    pub workers: usize,
    /// Sampling temperature; low values keep verdicts consistent.
    pub temperature: f32,
    /// Character cap applied to each description before prompting.
    pub description_limit: usize,
    /// Maximum number of candidates sent for assessment.
    pub pool_size: usize,
}

impl Default for RerankerConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_RERANK_WORKERS,
            temperature: DEFAULT_RERANK_TEMPERATURE,
            description_limit: RERANK_DESCRIPTION_LIMIT,
            pool_size: DEFAULT_RERANK_POOL_SIZE,
        }
    }
}

pub struct Reranker<G> {
    generator: Arc<G>,
    config: RerankerConfig,
}

impl<G: Generator + 'static> Reranker<G> {
    pub fn new(generator: Arc<G>, config: RerankerConfig) -> Self {
        Self { generator, config }
    }

    /// Assesses up to `pool_size` candidates against the profile summary and
    /// returns all of them in final presentation order.
    ///
    /// Candidates beyond the pool cap, and candidates whose assessment failed,
    /// come back without a verdict; ordering then falls through to their
    /// retrieval similarity.
    pub async fn rerank(
        &self,
        profile_summary: &str,
        candidates: Vec<ScoredCandidate>,
    ) -> Vec<RerankedCandidate> {
        let mut candidates = candidates;
        // A zero pool size means no cap.
        let cap = if self.config.pool_size == 0 {
            candidates.len()
        } else {
            self.config.pool_size.min(candidates.len())
        };
        let overflow = candidates.split_off(cap);

        let semaphore = Arc::new(Semaphore::new(self.config.workers.max(1)));
        let mut tasks: JoinSet<(usize, Option<RerankVerdict>)> = JoinSet::new();

        // Candidates stay owned here; tasks only produce verdicts. A task
        // that fails or panics leaves its slot empty and the candidate
        // degrades to its heuristic standing.
        for (index, candidate) in candidates.iter().enumerate() {
            let generator = Arc::clone(&self.generator);
            let permit_source = Arc::clone(&semaphore);
            let prompt = build_prompt(profile_summary, candidate, self.config.description_limit);
            let title = candidate.record.posting.title.clone();
            let temperature = self.config.temperature;

            tasks.spawn(async move {
                let _permit = match permit_source.acquire().await {
                    Ok(permit) => permit,
                    Err(_) => return (index, None),
                };

                let verdict = match generator.generate(&prompt, temperature).await {
                    Ok(reply) => {
                        let parsed = parse_verdict(&reply);
                        if parsed.is_none() {
                            warn!(title = %title, "assessment reply had no parseable verdict");
                        }
                        parsed
                    }
                    Err(e) if e.is_capacity() => {
                        warn!(
                            title = %title,
                            error = %e,
                            "assessment skipped under capacity pressure"
                        );
                        None
                    }
                    Err(e) => {
                        error!(title = %title, error = %e, "assessment failed");
                        None
                    }
                };

                (index, verdict)
            });
        }

        let mut verdicts: Vec<Option<RerankVerdict>> = Vec::new();
        verdicts.resize_with(candidates.len(), || None);
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, verdict)) => verdicts[index] = verdict,
                Err(e) => error!(error = %e, "assessment task panicked"),
            }
        }

        let mut results: Vec<RerankedCandidate> = candidates
            .into_iter()
            .zip(verdicts)
            .map(|(scored, verdict)| RerankedCandidate { scored, verdict })
            .collect();
        results.extend(overflow.into_iter().map(RerankedCandidate::without_verdict));

        sort_reranked(&mut results);
        debug!(total = results.len(), "rerank pass complete");
        results
    }
}

/// Final presentation order: recommended candidates first, then by fit score,
/// then by retrieval similarity. The sort is stable so ties keep their
/// incoming order.
pub fn sort_reranked(results: &mut [RerankedCandidate]) {
    results.sort_by(|a, b| {
        b.is_recommended()
            .cmp(&a.is_recommended())
            .then_with(|| {
                b.fit_score_for_ordering()
                    .partial_cmp(&a.fit_score_for_ordering())
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| {
                b.scored
                    .similarity_score
                    .partial_cmp(&a.scored.similarity_score)
                    .unwrap_or(Ordering::Equal)
            })
    });
}

fn parse_verdict(reply: &str) -> Option<RerankVerdict> {
    let object = extract_json_object(reply)?;
    serde_json::from_str(object).ok()
}

fn build_prompt(profile_summary: &str, candidate: &ScoredCandidate, limit: usize) -> String {
    let posting = &candidate.record.posting;
    let description = posting
        .description
        .as_deref()
        .map(|d| truncate_chars(d, limit))
        .unwrap_or_default();

    format!(
        "You are an experienced technical recruiter. Compare the candidate profile \
below with the job posting and judge the match.\n\n\
CANDIDATE PROFILE:\n{profile_summary}\n\n\
JOB POSTING:\nTitle: {title}\nCompany: {company}\nLocation: {location}\n\
Description:\n{description}\n\n\
Reply with a single JSON object and nothing else:\n\
{{\n  \"fit_score\": <0-100>,\n  \"is_recommended\": <true|false>,\n  \
\"reasoning\": \"<one or two sentences>\",\n  \
\"matching_keywords\": [\"...\"],\n  \"missing_keywords\": [\"...\"]\n}}",
        title = posting.title,
        company = posting.company,
        location = posting.location.as_deref().unwrap_or("unspecified"),
    )
}

#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use std::sync::Mutex;

    use super::{GenerationError, Generator};

    /// Scripted replies for a [`MockGenerator`].
    #[derive(Debug, Clone)]
    pub enum MockReply {
        /// Return this text verbatim.
        Text(String),
        /// Fail as rate limited.
        RateLimited,
        /// Fail as timed out.
        Timeout,
        /// Fail outright.
        Failed,
        /// Panic mid-call, taking the worker task down with it.
        Panic,
    }

    /// Generator with prompt-keyed replies and a global fallback.
    ///
    /// Worker scheduling makes call order nondeterministic, so replies are
    /// selected by prompt content rather than by arrival order.
    pub struct MockGenerator {
        keyed: Mutex<Vec<(String, MockReply)>>,
        fallback: MockReply,
    }

    impl MockGenerator {
        pub fn new(fallback: MockReply) -> Self {
            Self {
                keyed: Mutex::new(Vec::new()),
                fallback,
            }
        }

        /// Registers a reply for prompts containing `needle`.
        pub fn respond_when(&self, needle: impl Into<String>, reply: MockReply) {
            if let Ok(mut keyed) = self.keyed.lock() {
                keyed.push((needle.into(), reply));
            }
        }
    }

    impl Generator for MockGenerator {
        async fn generate(
            &self,
            prompt: &str,
            _temperature: f32,
        ) -> Result<String, GenerationError> {
            let reply = self
                .keyed
                .lock()
                .ok()
                .and_then(|keyed| {
                    keyed
                        .iter()
                        .find(|(needle, _)| prompt.contains(needle.as_str()))
                        .map(|(_, reply)| reply.clone())
                })
                .unwrap_or_else(|| self.fallback.clone());

            match reply {
                MockReply::Text(text) => Ok(text),
                MockReply::RateLimited => Err(GenerationError::RateLimited {
                    message: "quota exceeded".to_string(),
                }),
                MockReply::Timeout => Err(GenerationError::Timeout {
                    message: "deadline exceeded".to_string(),
                }),
                MockReply::Failed => Err(GenerationError::Failed {
                    message: "backend unavailable".to_string(),
                }),
                MockReply::Panic => panic!("generator crashed"),
            }
        }
    }
}

#[cfg(any(test, feature = "mock"))]
pub use mock::{MockGenerator, MockReply};
