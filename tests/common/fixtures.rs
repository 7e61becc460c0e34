//! Test fixtures for integration tests.

use jobscout::{CanonicalJobRecord, RawPosting, ScrapedJob};

pub const DEFAULT_DIM: usize = 8;

pub const DEFAULT_LOCATION: &str = "Istanbul, Turkey";

#[derive(Default)]
pub struct PostingBuilder {
    title: Option<String>,
    company: Option<String>,
    location: Option<String>,
    description: Option<String>,
    url: Option<String>,
    source_site: Option<String>,
    persona_source: Option<String>,
    search_term_used: Option<String>,
}

impl PostingBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn company(mut self, company: &str) -> Self {
        self.company = Some(company.to_string());
        self
    }

    pub fn location(mut self, location: &str) -> Self {
        self.location = Some(location.to_string());
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }

    pub fn source_site(mut self, site: &str) -> Self {
        self.source_site = Some(site.to_string());
        self
    }

    pub fn persona(mut self, persona: &str) -> Self {
        self.persona_source = Some(persona.to_string());
        self
    }

    pub fn build(self) -> RawPosting {
        RawPosting {
            title: self.title.unwrap_or_else(|| "Data Analyst".to_string()),
            company: self.company.unwrap_or_else(|| "Acme".to_string()),
            location: Some(self.location.unwrap_or_else(|| DEFAULT_LOCATION.to_string())),
            description: self.description,
            url: self.url,
            posted_at: None,
            source_site: self.source_site.unwrap_or_else(|| "indeed".to_string()),
            persona_source: self.persona_source.unwrap_or_else(|| "Analyst".to_string()),
            search_term_used: self
                .search_term_used
                .unwrap_or_else(|| "data analyst".to_string()),
        }
    }

    pub fn build_record(self) -> CanonicalJobRecord {
        CanonicalJobRecord::from_posting(self.build())
    }
}

/// Wire-format row as the scraping service would return it.
pub fn scraped(title: &str, company: &str, description: &str, url: &str) -> ScrapedJob {
    ScrapedJob {
        title: title.to_string(),
        company: company.to_string(),
        location: Some(DEFAULT_LOCATION.to_string()),
        description: Some(description.to_string()),
        job_url: Some(url.to_string()),
        date_posted: None,
    }
}

/// A rerank verdict reply wrapped the way generation backends usually wrap
/// JSON.
pub fn fenced_verdict(fit: f64, recommended: bool, reasoning: &str) -> String {
    format!(
        "```json\n{{\"fit_score\": {fit}, \"is_recommended\": {recommended}, \
\"reasoning\": \"{reasoning}\", \"matching_keywords\": [\"sql\"], \
\"missing_keywords\": []}}\n```"
    )
}
