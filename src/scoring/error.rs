use thiserror::Error;

#[derive(Debug, Error)]
/// Errors raised while building a scoring engine.
pub enum ScoringError {
    /// A configured keyword produced an invalid regex.
    #[error("invalid keyword pattern '{keyword}': {message}")]
    InvalidPattern {
        /// Offending keyword.
        keyword: String,
        /// Regex compiler message.
        message: String,
    },
}
