use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
/// Precondition failures around the candidate profile document.
///
/// These are checked once at run start and halt the run.
pub enum ProfileError {
    /// The profile file does not exist.
    #[error("profile document not found at '{path}'", path = path.display())]
    NotFound {
        /// Configured path.
        path: PathBuf,
    },

    /// The profile file exists but could not be read.
    #[error("profile document at '{path}' could not be read: {message}", path = path.display())]
    Unreadable {
        /// Configured path.
        path: PathBuf,
        /// I/O message.
        message: String,
    },

    /// The profile file is empty or whitespace-only.
    #[error("profile document at '{path}' is empty", path = path.display())]
    Empty {
        /// Configured path.
        path: PathBuf,
    },
}
