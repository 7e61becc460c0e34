//! Multi-site job collection.
//!
//! [`JobSpyApiClient`] talks to the scraping service over HTTP; the
//! [`SourceCollector`] works through personas one at a time, fanning one
//! request per site out in parallel for the persona in hand, and tags every
//! returned posting with its provenance. Individual site failures are logged
//! and skipped; the pass only fails when no request succeeds at all.

pub mod error;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::model::{PersonaSpec, RawPosting};

pub use error::ScrapeError;

/// One scrape call against a single site for a single persona.
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeRequest {
    pub site: String,
    pub search_term: String,
    pub location: String,
    pub results_wanted: u32,
    pub hours_old: u32,
}

/// A posting as returned by the scraping service.
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapedJob {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub job_url: Option<String>,
    #[serde(default)]
    pub date_posted: Option<NaiveDate>,
}

impl ScrapedJob {
    /// Converts the wire row to a posting with provenance attached.
    ///
    /// Rows without a title or company are unusable downstream and yield
    /// `None`.
    fn into_posting(self, site: &str, persona: &str, search_term: &str) -> Option<RawPosting> {
        if self.title.trim().is_empty() || self.company.trim().is_empty() {
            return None;
        }

        Some(RawPosting {
            title: self.title,
            company: self.company,
            location: self.location,
            description: self.description,
            url: self.job_url,
            posted_at: self.date_posted,
            source_site: site.to_string(),
            persona_source: persona.to_string(),
            search_term_used: search_term.to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct ScrapeResponse {
    #[serde(default)]
    jobs: Vec<ScrapedJob>,
}

/// Scraping backend interface.
pub trait JobScraper: Send + Sync {
    /// Fetches postings for a single site request.
    fn scrape(
        &self,
        request: &ScrapeRequest,
    ) -> impl std::future::Future<Output = Result<Vec<ScrapedJob>, ScrapeError>> + Send;
}

/// HTTP client for the JobSpy scraping service.
pub struct JobSpyApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl JobSpyApiClient {
    pub fn from_config(config: &Config) -> Result<Self, ScrapeError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ScrapeError::RequestFailed {
                site: "-".to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            http,
            base_url: config.scraper_url.trim_end_matches('/').to_string(),
        })
    }
}

impl JobScraper for JobSpyApiClient {
    async fn scrape(&self, request: &ScrapeRequest) -> Result<Vec<ScrapedJob>, ScrapeError> {
        let url = format!("{}/scrape", self.base_url);

        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| ScrapeError::RequestFailed {
                site: request.site.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::BadStatus {
                site: request.site.clone(),
                status: status.as_u16(),
            });
        }

        let decoded: ScrapeResponse =
            response.json().await.map_err(|e| ScrapeError::Decode {
                site: request.site.clone(),
                message: e.to_string(),
            })?;

        Ok(decoded.jobs)
    }
}

/// Fans scrape requests out across personas and sites.
pub struct SourceCollector<S> {
    scraper: Arc<S>,
    sites: Vec<String>,
    location: String,
}

impl<S: JobScraper + 'static> SourceCollector<S> {
    pub fn new(scraper: Arc<S>, sites: Vec<String>, location: impl Into<String>) -> Self {
        Self {
            scraper,
            sites,
            location: location.into(),
        }
    }

    /// Collects postings for every persona across every configured site.
    ///
    /// Personas run sequentially; concurrency never exceeds the site count.
    /// Returns one batch per (persona, site) request that succeeded, each
    /// posting tagged with the persona and search term that produced it.
    /// Fails only when every request failed.
    pub async fn collect(
        &self,
        personas: &[PersonaSpec],
        results_per_site: u32,
    ) -> Result<Vec<Vec<RawPosting>>, ScrapeError> {
        let mut batches = Vec::new();
        let mut attempted = 0usize;
        let mut failures = 0usize;

        for persona in personas {
            let (persona_batches, persona_failures) =
                self.collect_for_persona(persona, results_per_site).await;
            attempted += self.sites.len();
            failures += persona_failures;
            if !self.sites.is_empty() && persona_failures == self.sites.len() {
                warn!(persona = %persona.name, "every site failed for this persona");
            }
            batches.extend(persona_batches);
        }

        if attempted > 0 && failures == attempted {
            return Err(ScrapeError::AllSitesFailed { attempted });
        }

        let total: usize = batches.iter().map(Vec::len).sum();
        info!(
            requests = attempted,
            failed = failures,
            postings = total,
            "collection pass complete"
        );

        Ok(batches)
    }

    /// Fans one persona's request out across all sites and waits for the
    /// whole fan-out before returning. Yields the successful batches and
    /// the number of failed requests.
    async fn collect_for_persona(
        &self,
        persona: &PersonaSpec,
        results_per_site: u32,
    ) -> (Vec<Vec<RawPosting>>, usize) {
        let mut tasks: JoinSet<Result<Vec<RawPosting>, ScrapeError>> = JoinSet::new();

        for site in &self.sites {
            let scraper = Arc::clone(&self.scraper);
            let request = ScrapeRequest {
                site: site.clone(),
                search_term: persona.search_term.clone(),
                location: self.location.clone(),
                results_wanted: results_per_site.min(persona.max_results),
                hours_old: persona.max_age_hours,
            };
            let persona_name = persona.name.clone();

            tasks.spawn(async move {
                let jobs = scraper.scrape(&request).await?;
                let postings: Vec<RawPosting> = jobs
                    .into_iter()
                    .filter_map(|job| {
                        job.into_posting(&request.site, &persona_name, &request.search_term)
                    })
                    .collect();
                debug!(
                    site = %request.site,
                    persona = %persona_name,
                    count = postings.len(),
                    "site scrape complete"
                );
                Ok(postings)
            });
        }

        let mut batches = Vec::new();
        let mut failures = 0usize;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(batch)) => batches.push(batch),
                Ok(Err(e)) => {
                    failures += 1;
                    warn!(error = %e, "site scrape failed, continuing with remaining sites");
                }
                Err(e) => {
                    failures += 1;
                    warn!(error = %e, "scrape task panicked");
                }
            }
        }

        (batches, failures)
    }
}

#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::{JobScraper, ScrapeError, ScrapeRequest, ScrapedJob};

    /// Scraper serving canned rows keyed by `(site, search_term)`.
    #[derive(Default)]
    pub struct MockScraper {
        responses: Mutex<HashMap<(String, String), Vec<ScrapedJob>>>,
        failing_sites: Mutex<Vec<String>>,
    }

    impl MockScraper {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn stub(&self, site: &str, search_term: &str, jobs: Vec<ScrapedJob>) {
            if let Ok(mut responses) = self.responses.lock() {
                responses.insert((site.to_string(), search_term.to_string()), jobs);
            }
        }

        /// Makes every request against `site` fail.
        pub fn fail_site(&self, site: &str) {
            if let Ok(mut failing) = self.failing_sites.lock() {
                failing.push(site.to_string());
            }
        }
    }

    impl JobScraper for MockScraper {
        async fn scrape(&self, request: &ScrapeRequest) -> Result<Vec<ScrapedJob>, ScrapeError> {
            let failing = self
                .failing_sites
                .lock()
                .map(|f| f.contains(&request.site))
                .unwrap_or(false);
            if failing {
                return Err(ScrapeError::BadStatus {
                    site: request.site.clone(),
                    status: 503,
                });
            }

            Ok(self
                .responses
                .lock()
                .ok()
                .and_then(|responses| {
                    responses
                        .get(&(request.site.clone(), request.search_term.clone()))
                        .cloned()
                })
                .unwrap_or_default())
        }
    }
}

#[cfg(any(test, feature = "mock"))]
pub use mock::MockScraper;
