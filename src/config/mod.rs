//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `JOBSCOUT_*` environment
//! variables. The struct is built once at startup and passed into the
//! pipeline constructor; there is no process-global configuration state.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::path::PathBuf;

use crate::constants::{
    DEFAULT_COLLECTION_NAME, DEFAULT_MAX_AGE_HOURS, DEFAULT_RERANK_POOL_SIZE,
    DEFAULT_RERANK_TEMPERATURE, DEFAULT_RERANK_WORKERS, DEFAULT_RESULTS_PER_SITE,
    DEFAULT_SIMILARITY_THRESHOLD, DEFAULT_TOP_K, DEFAULT_VECTOR_SIZE_U64,
};

/// Runtime configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `JOBSCOUT_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Gemini API key. Required for live runs.
    pub gemini_api_key: String,

    /// Gemini API base URL. Default: `https://generativelanguage.googleapis.com`.
    pub gemini_base_url: String,

    /// Embedding model name. Default: `text-embedding-004`.
    pub embed_model: String,

    /// Reasoning model name used for reranking. Default: `gemini-1.5-flash-latest`.
    pub rerank_model: String,

    /// Per-request timeout for outbound HTTP calls, in seconds. Default: `30`.
    pub request_timeout_secs: u64,

    /// Qdrant endpoint URL. Default: `http://localhost:6334`.
    pub qdrant_url: String,

    /// Qdrant collection holding canonical job records. Default: `job_postings`.
    pub collection_name: String,

    /// Embedding vector size. Default: `768`.
    pub vector_size: u64,

    /// Base URL of the JobSpy-compatible scraping service. Default: `http://localhost:8000`.
    pub scraper_url: String,

    /// Target job boards. Default: `indeed,linkedin`.
    pub sites: Vec<String>,

    /// Search location passed to the scraper. Default: `Turkey`.
    pub location: String,

    /// Path to the candidate's profile document. Default: `./data/profile.txt`.
    pub profile_path: PathBuf,

    /// Minimum similarity percentage for a query hit to survive. Default: `60.0`.
    pub similarity_threshold: f64,

    /// Top-K for the vector query. Default: `50`.
    pub top_k: u64,

    /// Per-site result cap per persona. Default: `25`.
    pub results_per_site: u32,

    /// Posting age cap in hours. Default: `72`.
    pub max_age_hours: u32,

    /// Whether the LLM rerank stage runs at all. Default: `true`.
    pub rerank_enabled: bool,

    /// Rerank worker-pool size. Default: `4`.
    pub rerank_workers: usize,

    /// Number of top candidates admitted to reranking (0 = all). Default: `10`.
    pub rerank_pool_size: usize,

    /// Rerank sampling temperature. Default: `0.1`.
    pub rerank_temperature: f32,
}

/// Default Gemini endpoint used when `JOBSCOUT_GEMINI_BASE_URL` is not set.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default Qdrant URL used when `JOBSCOUT_QDRANT_URL` is not set.
pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";

impl Default for Config {
    fn default() -> Self {
        Self {
            gemini_api_key: String::new(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            embed_model: "text-embedding-004".to_string(),
            rerank_model: "gemini-1.5-flash-latest".to_string(),
            request_timeout_secs: 30,
            qdrant_url: DEFAULT_QDRANT_URL.to_string(),
            collection_name: DEFAULT_COLLECTION_NAME.to_string(),
            vector_size: DEFAULT_VECTOR_SIZE_U64,
            scraper_url: "http://localhost:8000".to_string(),
            sites: vec!["indeed".to_string(), "linkedin".to_string()],
            location: "Turkey".to_string(),
            profile_path: PathBuf::from("./data/profile.txt"),
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            top_k: DEFAULT_TOP_K,
            results_per_site: DEFAULT_RESULTS_PER_SITE,
            max_age_hours: DEFAULT_MAX_AGE_HOURS,
            rerank_enabled: true,
            rerank_workers: DEFAULT_RERANK_WORKERS,
            rerank_pool_size: DEFAULT_RERANK_POOL_SIZE,
            rerank_temperature: DEFAULT_RERANK_TEMPERATURE,
        }
    }
}

impl Config {
    const ENV_API_KEY: &'static str = "JOBSCOUT_GEMINI_API_KEY";
    const ENV_GEMINI_BASE_URL: &'static str = "JOBSCOUT_GEMINI_BASE_URL";
    const ENV_EMBED_MODEL: &'static str = "JOBSCOUT_EMBED_MODEL";
    const ENV_RERANK_MODEL: &'static str = "JOBSCOUT_RERANK_MODEL";
    const ENV_REQUEST_TIMEOUT: &'static str = "JOBSCOUT_REQUEST_TIMEOUT_SECS";
    const ENV_QDRANT_URL: &'static str = "JOBSCOUT_QDRANT_URL";
    const ENV_COLLECTION: &'static str = "JOBSCOUT_COLLECTION";
    const ENV_VECTOR_SIZE: &'static str = "JOBSCOUT_VECTOR_SIZE";
    const ENV_SCRAPER_URL: &'static str = "JOBSCOUT_SCRAPER_URL";
    const ENV_SITES: &'static str = "JOBSCOUT_SITES";
    const ENV_LOCATION: &'static str = "JOBSCOUT_LOCATION";
    const ENV_PROFILE_PATH: &'static str = "JOBSCOUT_PROFILE_PATH";
    const ENV_SIMILARITY_THRESHOLD: &'static str = "JOBSCOUT_SIMILARITY_THRESHOLD";
    const ENV_TOP_K: &'static str = "JOBSCOUT_TOP_K";
    const ENV_RESULTS_PER_SITE: &'static str = "JOBSCOUT_RESULTS_PER_SITE";
    const ENV_MAX_AGE_HOURS: &'static str = "JOBSCOUT_MAX_AGE_HOURS";
    const ENV_RERANK_ENABLED: &'static str = "JOBSCOUT_RERANK_ENABLED";
    const ENV_RERANK_WORKERS: &'static str = "JOBSCOUT_RERANK_WORKERS";
    const ENV_RERANK_POOL_SIZE: &'static str = "JOBSCOUT_RERANK_POOL_SIZE";
    const ENV_RERANK_TEMPERATURE: &'static str = "JOBSCOUT_RERANK_TEMPERATURE";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            gemini_api_key: Self::parse_string(Self::ENV_API_KEY, defaults.gemini_api_key),
            gemini_base_url: Self::parse_string(
                Self::ENV_GEMINI_BASE_URL,
                defaults.gemini_base_url,
            ),
            embed_model: Self::parse_string(Self::ENV_EMBED_MODEL, defaults.embed_model),
            rerank_model: Self::parse_string(Self::ENV_RERANK_MODEL, defaults.rerank_model),
            request_timeout_secs: Self::parse_number(
                Self::ENV_REQUEST_TIMEOUT,
                defaults.request_timeout_secs,
            )?,
            qdrant_url: Self::parse_string(Self::ENV_QDRANT_URL, defaults.qdrant_url),
            collection_name: Self::parse_string(Self::ENV_COLLECTION, defaults.collection_name),
            vector_size: Self::parse_number(Self::ENV_VECTOR_SIZE, defaults.vector_size)?,
            scraper_url: Self::parse_string(Self::ENV_SCRAPER_URL, defaults.scraper_url),
            sites: Self::parse_list(Self::ENV_SITES, defaults.sites),
            location: Self::parse_string(Self::ENV_LOCATION, defaults.location),
            profile_path: Self::parse_path(Self::ENV_PROFILE_PATH, defaults.profile_path),
            similarity_threshold: Self::parse_number(
                Self::ENV_SIMILARITY_THRESHOLD,
                defaults.similarity_threshold,
            )?,
            top_k: Self::parse_number(Self::ENV_TOP_K, defaults.top_k)?,
            results_per_site: Self::parse_number(
                Self::ENV_RESULTS_PER_SITE,
                defaults.results_per_site,
            )?,
            max_age_hours: Self::parse_number(Self::ENV_MAX_AGE_HOURS, defaults.max_age_hours)?,
            rerank_enabled: Self::parse_bool(Self::ENV_RERANK_ENABLED, defaults.rerank_enabled)?,
            rerank_workers: Self::parse_number(Self::ENV_RERANK_WORKERS, defaults.rerank_workers)?,
            rerank_pool_size: Self::parse_number(
                Self::ENV_RERANK_POOL_SIZE,
                defaults.rerank_pool_size,
            )?,
            rerank_temperature: Self::parse_number(
                Self::ENV_RERANK_TEMPERATURE,
                defaults.rerank_temperature,
            )?,
        })
    }

    /// Validates run preconditions that do not require I/O.
    ///
    /// Profile readability is checked separately at run start; this only
    /// covers values that would make any run nonsensical.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gemini_api_key.trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                var: Self::ENV_API_KEY.to_string(),
            });
        }

        if !(0.0..=100.0).contains(&self.similarity_threshold) {
            return Err(ConfigError::OutOfRange {
                var: Self::ENV_SIMILARITY_THRESHOLD.to_string(),
                value: self.similarity_threshold,
                min: 0.0,
                max: 100.0,
            });
        }

        if self.rerank_workers == 0 {
            return Err(ConfigError::OutOfRange {
                var: Self::ENV_RERANK_WORKERS.to_string(),
                value: 0.0,
                min: 1.0,
                max: f64::MAX,
            });
        }

        if self.max_age_hours == 0 {
            return Err(ConfigError::OutOfRange {
                var: Self::ENV_MAX_AGE_HOURS.to_string(),
                value: 0.0,
                min: 1.0,
                max: f64::MAX,
            });
        }

        if self.profile_path.exists() && !self.profile_path.is_file() {
            return Err(ConfigError::NotAFile {
                path: self.profile_path.clone(),
            });
        }

        Ok(())
    }

    fn parse_string(var: &str, default: String) -> String {
        env::var(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(default)
    }

    fn parse_path(var: &str, default: PathBuf) -> PathBuf {
        env::var(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or(default)
    }

    fn parse_list(var: &str, default: Vec<String>) -> Vec<String> {
        match env::var(var) {
            Ok(value) => {
                let items: Vec<String> = value
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
                if items.is_empty() { default } else { items }
            }
            Err(_) => default,
        }
    }

    fn parse_number<T: std::str::FromStr>(var: &str, default: T) -> Result<T, ConfigError> {
        match env::var(var) {
            Ok(value) => value.trim().parse().map_err(|_| ConfigError::InvalidValue {
                var: var.to_string(),
                value,
            }),
            Err(_) => Ok(default),
        }
    }

    fn parse_bool(var: &str, default: bool) -> Result<bool, ConfigError> {
        match env::var(var) {
            Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                _ => Err(ConfigError::InvalidValue {
                    var: var.to_string(),
                    value,
                }),
            },
            Err(_) => Ok(default),
        }
    }
}
