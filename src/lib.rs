//! Jobscout library crate (used by the CLI binary and integration tests).
//!
//! # Public API Surface
//!
//! The exports are organized by module:
//!
//! ## Core Types (Stable)
//! - [`Config`], [`ConfigError`] - Run configuration
//! - [`PersonaSpec`], [`RawPosting`], [`CanonicalJobRecord`] - Data model
//! - [`Pipeline`], [`RunOptions`], [`PipelineReport`] - Orchestration
//!
//! ## Collection & Scoring
//! - [`SourceCollector`], [`JobSpyApiClient`] - Multi-site scraping
//! - [`ScoringEngine`], [`ScoringConfig`] - Heuristic relevance scoring
//! - [`Reranker`], [`RerankerConfig`] - LLM-backed candidate assessment
//!
//! ## Vector Index
//! - [`JobIndex`] - Idempotent job-posting index
//! - [`QdrantClient`] - Direct Qdrant access
//!
//! ## External Services
//! - [`GeminiClient`] - Embedding and text generation over REST
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod collector;
pub mod config;
pub mod constants;
pub mod dedup;
pub mod embedding;
pub mod gemini;
pub mod hashing;
pub mod model;
pub mod pipeline;
pub mod profile;
pub mod rerank;
pub mod scoring;
pub mod vectordb;

pub use collector::{JobScraper, JobSpyApiClient, ScrapeError, ScrapedJob, SourceCollector};
pub use config::{Config, ConfigError};
pub use dedup::merge_batches;
pub use embedding::{EmbedError, Embedder};
pub use gemini::{GeminiClient, GeminiError};
pub use hashing::{hash_to_u64, stable_posting_id};
pub use model::{
    CanonicalJobRecord, PersonaSpec, RawPosting, RerankVerdict, RerankedCandidate, ScoreBreakdown,
    ScoredCandidate,
};
pub use pipeline::{
    Pipeline, PipelineError, PipelineReport, PipelineStats, RunOptions, RunOutcome, ShutdownHandle,
};
pub use profile::{
    ProfileError, ProfileMetadata, build_dynamic_personas, default_personas, extract_metadata,
    load_profile, profile_summary,
};
pub use rerank::{GenerationError, Generator, Reranker, RerankerConfig};
pub use scoring::{ScoringConfig, ScoringEngine, ScoringError};
pub use vectordb::{JobIndex, JobPoint, QdrantClient, QueryHit, VectorDbClient, VectorDbError};

#[cfg(any(test, feature = "mock"))]
pub use collector::MockScraper;
#[cfg(any(test, feature = "mock"))]
pub use embedding::MockEmbedder;
#[cfg(any(test, feature = "mock"))]
pub use rerank::{MockGenerator, MockReply};
#[cfg(any(test, feature = "mock"))]
pub use vectordb::MockVectorDb;
