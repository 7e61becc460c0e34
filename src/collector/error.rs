use thiserror::Error;

#[derive(Debug, Error)]
/// Errors from the scraping stage.
pub enum ScrapeError {
    /// The scraper service could not be reached.
    #[error("scrape request to site '{site}' failed: {message}")]
    RequestFailed {
        /// Target job board.
        site: String,
        /// Transport message.
        message: String,
    },

    /// The scraper service answered with a non-success status.
    #[error("scraper returned status {status} for site '{site}'")]
    BadStatus {
        /// Target job board.
        site: String,
        /// HTTP status code.
        status: u16,
    },

    /// The scraper response body could not be decoded.
    #[error("failed to decode scraper response for site '{site}': {message}")]
    Decode {
        /// Target job board.
        site: String,
        /// Decoder message.
        message: String,
    },

    /// Every site request in the pass failed; there is nothing to process.
    #[error("all {attempted} scrape requests failed")]
    AllSitesFailed {
        /// Number of site requests attempted.
        attempted: usize,
    },
}
