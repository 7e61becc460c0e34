use thiserror::Error;

use crate::collector::ScrapeError;
use crate::profile::ProfileError;
use crate::scoring::ScoringError;
use crate::vectordb::VectorDbError;

#[derive(Debug, Error)]
/// Run-halting failures. Per-item problems never surface here; they are
/// absorbed into [`PipelineStats`](super::PipelineStats).
pub enum PipelineError {
    /// Profile precondition failed.
    #[error(transparent)]
    Profile(#[from] ProfileError),

    /// Scoring engine construction failed.
    #[error(transparent)]
    Scoring(#[from] ScoringError),

    /// Vector index operation failed.
    #[error(transparent)]
    VectorDb(#[from] VectorDbError),

    /// Collection failed in a way other than all sites being down.
    #[error(transparent)]
    Collection(#[from] ScrapeError),

    /// The profile document itself could not be embedded, so the index
    /// cannot be queried.
    #[error("profile embedding failed: {message}")]
    ProfileEmbedding {
        /// Provider message.
        message: String,
    },
}
