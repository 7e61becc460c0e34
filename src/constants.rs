//! Cross-cutting, shared constants.
//!
//! Prefer deriving secondary constants from primary ones to avoid drift.

/// Embedding dimension of the default Gemini embedding model (`text-embedding-004`).
pub const DEFAULT_EMBEDDING_DIM: usize = 768;

pub const DEFAULT_VECTOR_SIZE_U64: u64 = DEFAULT_EMBEDDING_DIM as u64;

/// Default Qdrant collection for canonical job records.
pub const DEFAULT_COLLECTION_NAME: &str = "job_postings";

/// Similarity percentage (0-100) a vector-query hit must reach to survive filtering.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 60.0;

/// Nearest-neighbour candidates pulled from the index per run.
pub const DEFAULT_TOP_K: u64 = 50;

/// Description prefix length used for composite-key deduplication.
pub const DEDUP_DESCRIPTION_PREFIX: usize = 100;

/// Description prefix considered by the heuristic scorer. Caps regex cost and
/// avoids boilerplate-footer noise.
pub const SCORING_DESCRIPTION_LIMIT: usize = 3000;

/// Character budget for text sent to the embedding service. The service is
/// expected to truncate overlong input itself; we pre-truncate defensively.
pub const EMBED_MAX_CHARS: usize = 8000;

/// Character budget for a job description inside the rerank prompt.
pub const RERANK_DESCRIPTION_LIMIT: usize = 4000;

/// Character budget for the profile summary handed to the reranker.
pub const PROFILE_SUMMARY_LIMIT: usize = 1500;

/// Profile prefix scanned by the heuristic metadata extractor.
pub const PROFILE_METADATA_SCAN_LIMIT: usize = 4000;

/// Default rerank worker-pool size. Small on purpose: the reasoning service
/// is rate limited per minute, not per connection.
pub const DEFAULT_RERANK_WORKERS: usize = 4;

/// Default number of top candidates admitted to the rerank stage.
pub const DEFAULT_RERANK_POOL_SIZE: usize = 10;

/// Sampling temperature for rerank calls. Low, favouring determinism.
pub const DEFAULT_RERANK_TEMPERATURE: f32 = 0.1;

/// Default posting age cap in hours (3 days).
pub const DEFAULT_MAX_AGE_HOURS: u32 = 72;

/// Default per-site result cap for a single persona search.
pub const DEFAULT_RESULTS_PER_SITE: u32 = 25;

/// Retry attempts for a single embedding call before the item is skipped.
pub const EMBED_RETRY_ATTEMPTS: u32 = 3;
