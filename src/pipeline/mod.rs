//! Run orchestration.
//!
//! [`Pipeline::run`] sequences the stages: profile preconditions, metadata
//! extraction, scoring setup, collection, dedup, indexing, retrieval and
//! scoring, optional reranking, and the final report. A stage with nothing
//! to hand forward ends the run normally with an empty result; only
//! precondition failures and index errors propagate as [`PipelineError`].
//! Personas run sequentially so the per-persona site fan-out bounds total
//! outbound load.

pub mod context;
pub mod error;

mod report;

#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use crate::collector::{JobScraper, ScrapeError, SourceCollector};
use crate::config::Config;
use crate::dedup::merge_batches;
use crate::embedding::Embedder;
use crate::model::{CanonicalJobRecord, PersonaSpec, RerankedCandidate, ScoredCandidate};
use crate::profile::{
    ProfileMetadata, build_dynamic_personas, default_personas, extract_metadata, load_profile,
    profile_summary,
};
use crate::rerank::{Generator, Reranker, sort_reranked};
use crate::scoring::{ScoringConfig, ScoringEngine};
use crate::vectordb::{JobIndex, VectorDbClient};

pub use context::{PipelineReport, PipelineStats, RunOptions, RunOutcome};
pub use error::PipelineError;

use context::RunContext;

/// Signals a running pipeline to stop between stages.
#[derive(Clone)]
pub struct ShutdownHandle {
    tx: watch::Sender<bool>,
}

impl ShutdownHandle {
    /// Requests a stop. In-flight per-item work finishes; the run ends at
    /// the next stage boundary.
    pub fn shutdown(&self) {
        let _ = self.tx.send(true);
    }
}

pub struct Pipeline<S, E, V, G> {
    collector: SourceCollector<S>,
    embedder: Arc<E>,
    index: JobIndex<V>,
    reranker: Reranker<G>,
    config: Config,
    cancel: watch::Receiver<bool>,
}

impl<S, E, V, G> Pipeline<S, E, V, G>
where
    S: JobScraper + 'static,
    E: Embedder,
    V: VectorDbClient,
    G: Generator + 'static,
{
    pub fn new(
        collector: SourceCollector<S>,
        embedder: Arc<E>,
        index: JobIndex<V>,
        reranker: Reranker<G>,
        config: Config,
    ) -> (Self, ShutdownHandle) {
        let (tx, cancel) = watch::channel(false);
        (
            Self {
                collector,
                embedder,
                index,
                reranker,
                config,
                cancel,
            },
            ShutdownHandle { tx },
        )
    }

    fn is_cancelled(&self) -> bool {
        *self.cancel.borrow()
    }

    /// Runs the full stage sequence once.
    pub async fn run(&self, options: RunOptions) -> Result<PipelineReport, PipelineError> {
        let mut ctx = self.prepare_context(&options)?;
        if ctx.personas.is_empty() {
            warn!("no personas to search with, ending run");
            return Ok(PipelineReport::empty(RunOutcome::NoPersonas, ctx.stats));
        }
        info!(personas = ctx.personas.len(), "run starting");

        let scoring_config = ScoringConfig::default()
            .with_skill_importance(&ctx.metadata.skills, &ctx.metadata.skill_importance);
        let engine = ScoringEngine::new(&scoring_config)?;

        let profile_embedding = self
            .embedder
            .embed(&ctx.profile_text)
            .await
            .map_err(|e| PipelineError::ProfileEmbedding {
                message: e.to_string(),
            })?;
        let engine = engine.with_profile_embedding(profile_embedding.clone());

        if self.is_cancelled() {
            return Ok(PipelineReport::empty(RunOutcome::Cancelled, ctx.stats));
        }

        let results_per_site = options
            .results_per_site
            .unwrap_or(self.config.results_per_site);
        let batches = match self.collector.collect(&ctx.personas, results_per_site).await {
            Ok(batches) => batches,
            Err(e @ ScrapeError::AllSitesFailed { .. }) => {
                warn!(error = %e, "nothing collected, ending run");
                return Ok(PipelineReport::empty(RunOutcome::NoPostings, ctx.stats));
            }
            Err(e) => return Err(e.into()),
        };
        ctx.stats.collected = batches.iter().map(Vec::len).sum();
        if ctx.stats.collected == 0 {
            info!("no postings collected, ending run");
            return Ok(PipelineReport::empty(RunOutcome::NoPostings, ctx.stats));
        }

        let records = merge_batches(batches);
        ctx.stats.unique = records.len();

        if self.is_cancelled() {
            return Ok(PipelineReport::empty(RunOutcome::Cancelled, ctx.stats));
        }

        let fresh_embeddings = self.index_records(records, &mut ctx).await?;

        if self.is_cancelled() {
            return Ok(PipelineReport::empty(RunOutcome::Cancelled, ctx.stats));
        }

        let threshold = options
            .similarity_threshold
            .unwrap_or(self.config.similarity_threshold);
        let candidates = self
            .retrieve_and_score(&engine, profile_embedding, threshold, &fresh_embeddings)
            .await?;
        ctx.stats.matched = candidates.len();
        if candidates.is_empty() {
            info!(threshold, "no candidates above threshold, ending run");
            return Ok(PipelineReport::empty(RunOutcome::NoMatches, ctx.stats));
        }

        if self.is_cancelled() {
            return Ok(PipelineReport::empty(RunOutcome::Cancelled, ctx.stats));
        }

        let rerank_enabled = options.rerank.unwrap_or(self.config.rerank_enabled);
        let results = if rerank_enabled && !ctx.profile_summary.is_empty() {
            let reranked = self.reranker.rerank(&ctx.profile_summary, candidates).await;
            ctx.stats.assessed = reranked.iter().filter(|r| r.verdict.is_some()).count();
            ctx.stats.degraded = reranked.len() - ctx.stats.assessed;
            reranked
        } else {
            let mut plain: Vec<RerankedCandidate> = candidates
                .into_iter()
                .map(RerankedCandidate::without_verdict)
                .collect();
            sort_reranked(&mut plain);
            plain
        };

        let report = PipelineReport {
            outcome: RunOutcome::Completed,
            results,
            stats: ctx.stats,
        };
        report::log_report(&report);
        Ok(report)
    }

    /// Profile preconditions, metadata extraction, and persona selection.
    fn prepare_context(&self, options: &RunOptions) -> Result<RunContext, PipelineError> {
        let profile_text = load_profile(&self.config.profile_path)?;
        let summary = profile_summary(&profile_text);
        let metadata = extract_metadata(&profile_text);

        let personas = self.select_personas(&metadata, options);

        Ok(RunContext {
            personas,
            profile_text,
            profile_summary: summary,
            metadata,
            stats: PipelineStats::default(),
        })
    }

    fn select_personas(
        &self,
        metadata: &ProfileMetadata,
        options: &RunOptions,
    ) -> Vec<PersonaSpec> {
        let max_age = self.config.max_age_hours;
        let per_site = self.config.results_per_site;

        let mut personas = if metadata.is_empty() {
            warn!("no target titles extracted, falling back to static personas");
            default_personas(max_age, per_site)
        } else {
            build_dynamic_personas(&metadata.target_titles, max_age, per_site)
        };

        if let Some(selected) = &options.personas {
            personas.retain(|p| selected.contains(&p.name));
        }
        personas.retain(PersonaSpec::is_valid);
        personas
    }

    /// Embeds and indexes new records, skipping ids already stored so
    /// re-runs spend no embedding quota on them. Returns the embeddings
    /// produced this run, keyed by record id.
    async fn index_records(
        &self,
        records: Vec<CanonicalJobRecord>,
        ctx: &mut RunContext,
    ) -> Result<HashMap<u64, Vec<f32>>, PipelineError> {
        self.index.ensure_ready().await?;

        let mut fresh: HashMap<u64, Vec<f32>> = HashMap::new();
        let mut to_upsert = Vec::new();
        let mut embeddings = Vec::new();

        for record in records {
            if self.index.contains(record.id).await {
                ctx.stats.skipped_existing += 1;
                continue;
            }
            match self.embedder.embed(&embed_text(&record)).await {
                Ok(vector) => {
                    fresh.insert(record.id, vector.clone());
                    embeddings.push(Some(vector));
                }
                Err(e) => {
                    warn!(
                        title = %record.posting.title,
                        error = %e,
                        "embedding failed, excluding posting from the index"
                    );
                    ctx.stats.embed_failures += 1;
                    embeddings.push(None);
                }
            }
            to_upsert.push(record);
        }

        let outcome = self.index.upsert_records(to_upsert, embeddings).await?;
        ctx.stats.indexed = outcome.inserted;
        ctx.stats.skipped_existing += outcome.skipped_existing;

        Ok(fresh)
    }

    /// Queries the index with the profile embedding and keeps hits clearing
    /// both the similarity and heuristic thresholds.
    async fn retrieve_and_score(
        &self,
        engine: &ScoringEngine,
        profile_embedding: Vec<f32>,
        similarity_threshold: f64,
        fresh_embeddings: &HashMap<u64, Vec<f32>>,
    ) -> Result<Vec<ScoredCandidate>, PipelineError> {
        let hits = self.index.query(profile_embedding, self.config.top_k).await?;

        let mut candidates = Vec::new();
        for hit in hits {
            if hit.similarity_score < similarity_threshold {
                continue;
            }
            let job_embedding = fresh_embeddings.get(&hit.record.id).map(Vec::as_slice);
            let (heuristic_score, breakdown) = engine.score(&hit.record, job_embedding);
            if !engine.should_include(heuristic_score) {
                continue;
            }
            candidates.push(ScoredCandidate {
                record: hit.record,
                similarity_score: hit.similarity_score,
                heuristic_score,
                breakdown,
            });
        }

        // Heuristic-first order decides who enters the rerank pool.
        candidates.sort_by(|a, b| {
            b.heuristic_score.cmp(&a.heuristic_score).then_with(|| {
                b.similarity_score
                    .partial_cmp(&a.similarity_score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
        });

        Ok(candidates)
    }
}

fn embed_text(record: &CanonicalJobRecord) -> String {
    let posting = &record.posting;
    let mut text = format!("{} at {}", posting.title, posting.company);
    if let Some(location) = &posting.location {
        text.push_str(". ");
        text.push_str(location);
    }
    if let Some(description) = &posting.description {
        text.push_str(". ");
        text.push_str(description);
    }
    text
}
