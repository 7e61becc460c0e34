use crate::model::{PersonaSpec, RerankedCandidate};
use crate::profile::ProfileMetadata;

/// Per-run overrides supplied by the caller (typically the CLI).
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Restrict the run to personas with these names.
    pub personas: Option<Vec<String>>,
    /// Override the configured results-per-site cap.
    pub results_per_site: Option<u32>,
    /// Override the configured similarity threshold.
    pub similarity_threshold: Option<f64>,
    /// Force reranking on or off for this run.
    pub rerank: Option<bool>,
}

/// Aggregate counters for one run. Per-item failures land here instead of
/// propagating as errors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Raw postings returned across all site requests.
    pub collected: usize,
    /// Records surviving deduplication.
    pub unique: usize,
    /// Records newly written to the vector index.
    pub indexed: usize,
    /// Records skipped because they were already indexed.
    pub skipped_existing: usize,
    /// Records dropped because their embedding failed.
    pub embed_failures: usize,
    /// Retrieval hits passing both thresholds.
    pub matched: usize,
    /// Candidates with a rerank verdict attached.
    pub assessed: usize,
    /// Candidates returned without a verdict (capacity, parse failure, or
    /// pool overflow).
    pub degraded: usize,
}

/// How a run ended. Every variant is a normal termination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The full stage sequence ran and produced ranked results.
    Completed,
    /// No persona was left to search with.
    NoPersonas,
    /// Collection produced nothing to process.
    NoPostings,
    /// Retrieval or thresholding left no candidates.
    NoMatches,
    /// The run was signaled to stop between stages.
    Cancelled,
}

/// Final product of a run: outcome, ranked results, and counters.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub outcome: RunOutcome,
    pub results: Vec<RerankedCandidate>,
    pub stats: PipelineStats,
}

impl PipelineReport {
    pub(super) fn empty(outcome: RunOutcome, stats: PipelineStats) -> Self {
        Self {
            outcome,
            results: Vec::new(),
            stats,
        }
    }
}

/// Mutable state threaded through one run. Each run builds its own context;
/// nothing here is shared across runs.
#[derive(Debug, Clone)]
pub(super) struct RunContext {
    pub personas: Vec<PersonaSpec>,
    pub profile_text: String,
    pub profile_summary: String,
    pub metadata: ProfileMetadata,
    pub stats: PipelineStats,
}
