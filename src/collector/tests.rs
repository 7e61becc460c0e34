use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::mock::MockScraper;
use super::{JobScraper, ScrapeError, ScrapeRequest, ScrapedJob, SourceCollector};
use crate::model::PersonaSpec;

fn persona(name: &str, term: &str) -> PersonaSpec {
    PersonaSpec::new(name, term, 72, 25)
}

fn job(title: &str, company: &str, url: &str) -> ScrapedJob {
    ScrapedJob {
        title: title.to_string(),
        company: company.to_string(),
        location: Some("Istanbul".to_string()),
        description: Some("Analysis role".to_string()),
        job_url: Some(url.to_string()),
        date_posted: None,
    }
}

#[tokio::test]
async fn tags_postings_with_provenance() {
    let scraper = MockScraper::new();
    scraper.stub(
        "indeed",
        "data analyst",
        vec![job("Data Analyst", "Acme", "https://a/1")],
    );

    let collector = SourceCollector::new(
        Arc::new(scraper),
        vec!["indeed".to_string()],
        "Turkey",
    );

    let batches = collector
        .collect(&[persona("data_analyst", "data analyst")], 25)
        .await
        .unwrap();

    let postings: Vec<_> = batches.into_iter().flatten().collect();
    assert_eq!(postings.len(), 1);
    assert_eq!(postings[0].source_site, "indeed");
    assert_eq!(postings[0].persona_source, "data_analyst");
    assert_eq!(postings[0].search_term_used, "data analyst");
}

#[tokio::test]
async fn fans_out_across_personas_and_sites() {
    let scraper = MockScraper::new();
    scraper.stub("indeed", "data analyst", vec![job("Data Analyst", "Acme", "https://a/1")]);
    scraper.stub("linkedin", "data analyst", vec![job("BI Analyst", "Beta", "https://b/1")]);
    scraper.stub("indeed", "data engineer", vec![job("Data Engineer", "Acme", "https://a/2")]);
    scraper.stub("linkedin", "data engineer", vec![]);

    let collector = SourceCollector::new(
        Arc::new(scraper),
        vec!["indeed".to_string(), "linkedin".to_string()],
        "Turkey",
    );

    let batches = collector
        .collect(
            &[
                persona("data_analyst", "data analyst"),
                persona("data_engineer", "data engineer"),
            ],
            25,
        )
        .await
        .unwrap();

    assert_eq!(batches.len(), 4);
    let total: usize = batches.iter().map(Vec::len).sum();
    assert_eq!(total, 3);
}

#[tokio::test]
async fn personas_are_searched_one_at_a_time() {
    #[derive(Default)]
    struct TrackingScraper {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl JobScraper for TrackingScraper {
        async fn scrape(&self, _request: &ScrapeRequest) -> Result<Vec<ScrapedJob>, ScrapeError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(25)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(Vec::new())
        }
    }

    let scraper = Arc::new(TrackingScraper::default());
    let collector = SourceCollector::new(
        Arc::clone(&scraper),
        vec!["indeed".to_string()],
        "Turkey",
    );

    collector
        .collect(
            &[
                persona("data_analyst", "data analyst"),
                persona("data_engineer", "data engineer"),
                persona("bi_specialist", "bi specialist"),
            ],
            25,
        )
        .await
        .unwrap();

    // One configured site: requests from different personas never overlap.
    assert_eq!(scraper.peak.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn partial_site_failure_is_tolerated() {
    let scraper = MockScraper::new();
    scraper.stub("indeed", "data analyst", vec![job("Data Analyst", "Acme", "https://a/1")]);
    scraper.fail_site("linkedin");

    let collector = SourceCollector::new(
        Arc::new(scraper),
        vec!["indeed".to_string(), "linkedin".to_string()],
        "Turkey",
    );

    let batches = collector
        .collect(&[persona("data_analyst", "data analyst")], 25)
        .await
        .unwrap();

    let total: usize = batches.iter().map(Vec::len).sum();
    assert_eq!(total, 1);
}

#[tokio::test]
async fn all_sites_failing_is_an_error() {
    let scraper = MockScraper::new();
    scraper.fail_site("indeed");
    scraper.fail_site("linkedin");

    let collector = SourceCollector::new(
        Arc::new(scraper),
        vec!["indeed".to_string(), "linkedin".to_string()],
        "Turkey",
    );

    let err = collector
        .collect(&[persona("data_analyst", "data analyst")], 25)
        .await
        .unwrap_err();
    assert!(matches!(err, ScrapeError::AllSitesFailed { attempted: 2 }));
}

#[tokio::test]
async fn rows_without_title_or_company_are_dropped() {
    let scraper = MockScraper::new();
    scraper.stub(
        "indeed",
        "data analyst",
        vec![
            job("Data Analyst", "Acme", "https://a/1"),
            job("", "Ghost Co", "https://a/2"),
            job("Nameless Employer", "  ", "https://a/3"),
        ],
    );

    let collector = SourceCollector::new(Arc::new(scraper), vec!["indeed".to_string()], "Turkey");

    let batches = collector
        .collect(&[persona("data_analyst", "data analyst")], 25)
        .await
        .unwrap();

    let postings: Vec<_> = batches.into_iter().flatten().collect();
    assert_eq!(postings.len(), 1);
    assert_eq!(postings[0].title, "Data Analyst");
}

#[tokio::test]
async fn requests_are_capped_by_persona_max_results() {
    // The cap is applied to the request itself; the mock just needs to see
    // the call succeed with no stubbed rows.
    let scraper = MockScraper::new();
    let collector = SourceCollector::new(Arc::new(scraper), vec!["indeed".to_string()], "Turkey");

    let mut small = persona("data_analyst", "data analyst");
    small.max_results = 5;

    let batches = collector.collect(&[small], 25).await.unwrap();
    assert_eq!(batches.len(), 1);
    assert!(batches[0].is_empty());
}
