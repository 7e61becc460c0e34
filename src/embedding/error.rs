use thiserror::Error;

use crate::gemini::GeminiError;

#[derive(Debug, Error)]
/// Errors surfaced through the embedding capability boundary.
pub enum EmbedError {
    /// The provider failed after its own retry policy was exhausted.
    #[error("embedding provider failure: {message}")]
    Provider {
        /// Provider error message.
        message: String,
    },
}

impl From<GeminiError> for EmbedError {
    fn from(err: GeminiError) -> Self {
        EmbedError::Provider {
            message: err.to_string(),
        }
    }
}
