use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors raised while loading or validating configuration.
pub enum ConfigError {
    /// A required setting is missing.
    #[error("missing required configuration: set {var}")]
    MissingRequired {
        /// Environment variable name.
        var: String,
    },

    /// A setting could not be parsed.
    #[error("invalid value for {var}: '{value}'")]
    InvalidValue {
        /// Environment variable name.
        var: String,
        /// Offending raw value.
        value: String,
    },

    /// A threshold is outside its allowed range.
    #[error("{var} must be within {min}..={max}, got {value}")]
    OutOfRange {
        /// Environment variable name.
        var: String,
        /// Offending value.
        value: f64,
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },

    /// A configured path exists but is not a regular file.
    #[error("path is not a file: {path}")]
    NotAFile {
        /// Offending path.
        path: PathBuf,
    },
}
