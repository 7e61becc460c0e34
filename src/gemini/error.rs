use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by the Gemini REST client.
pub enum GeminiError {
    /// The service reported rate-limit or quota exhaustion (HTTP 429).
    #[error("rate limit or quota exhausted for model '{model}': {message}")]
    RateLimited {
        /// Model name.
        model: String,
        /// Error message.
        message: String,
    },

    /// The call exceeded its deadline.
    #[error("request to model '{model}' timed out: {message}")]
    Timeout {
        /// Model name.
        model: String,
        /// Error message.
        message: String,
    },

    /// Transport-level failure (connection refused, DNS, TLS).
    #[error("transport error calling model '{model}': {message}")]
    Transport {
        /// Model name.
        model: String,
        /// Error message.
        message: String,
    },

    /// Non-success HTTP status other than 429.
    #[error("API error from model '{model}' (status {status}): {message}")]
    Api {
        /// Model name.
        model: String,
        /// HTTP status code.
        status: u16,
        /// Response body excerpt.
        message: String,
    },

    /// The response decoded but carried no usable content.
    #[error("empty response from model '{model}'")]
    EmptyResponse {
        /// Model name.
        model: String,
    },

    /// The response body could not be decoded.
    #[error("failed to decode response from model '{model}': {message}")]
    Decode {
        /// Model name.
        model: String,
        /// Decoder message.
        message: String,
    },
}

impl GeminiError {
    /// Transient failures worth retrying with backoff.
    pub fn is_retryable(&self) -> bool {
        match self {
            GeminiError::RateLimited { .. }
            | GeminiError::Timeout { .. }
            | GeminiError::Transport { .. } => true,
            GeminiError::Api { status, .. } => *status >= 500,
            GeminiError::EmptyResponse { .. } | GeminiError::Decode { .. } => false,
        }
    }
}
