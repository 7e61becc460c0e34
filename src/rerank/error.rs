use thiserror::Error;

use crate::gemini::GeminiError;

#[derive(Debug, Error)]
/// Errors from a text generation backend.
pub enum GenerationError {
    /// The backend reported rate-limit or quota exhaustion.
    #[error("generation rate limited: {message}")]
    RateLimited {
        /// Backend message.
        message: String,
    },

    /// The generation call exceeded its deadline.
    #[error("generation timed out: {message}")]
    Timeout {
        /// Backend message.
        message: String,
    },

    /// Any other generation failure.
    #[error("generation failed: {message}")]
    Failed {
        /// Backend message.
        message: String,
    },
}

impl From<GeminiError> for GenerationError {
    fn from(err: GeminiError) -> Self {
        match err {
            GeminiError::RateLimited { message, .. } => GenerationError::RateLimited { message },
            GeminiError::Timeout { message, .. } => GenerationError::Timeout { message },
            other => GenerationError::Failed {
                message: other.to_string(),
            },
        }
    }
}

impl GenerationError {
    /// Whether the failure is transient capacity pressure rather than a
    /// broken request.
    pub fn is_capacity(&self) -> bool {
        matches!(
            self,
            GenerationError::RateLimited { .. } | GenerationError::Timeout { .. }
        )
    }
}
