use std::io::Write;
use std::sync::Arc;

use tempfile::NamedTempFile;

use super::*;
use crate::collector::{MockScraper, ScrapedJob, SourceCollector};
use crate::config::Config;
use crate::embedding::MockEmbedder;
use crate::rerank::{MockGenerator, MockReply, Reranker, RerankerConfig};
use crate::vectordb::{JobIndex, MockVectorDb};

const DIM: usize = 8;
const ANALYST_TERM: &str = "(\"Analyst\") -Senior -Lead -Manager -Director -Principal";

fn profile_file(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{text}").unwrap();
    file
}

fn verdict_reply(fit: f64, recommended: bool) -> MockReply {
    MockReply::Text(format!(
        "```json\n{{\"fit_score\": {fit}, \"is_recommended\": {recommended}, \
\"reasoning\": \"ok\", \"matching_keywords\": [], \"missing_keywords\": []}}\n```"
    ))
}

fn job(title: &str, url: &str) -> ScrapedJob {
    ScrapedJob {
        title: title.to_string(),
        company: "Acme".to_string(),
        location: Some("Istanbul".to_string()),
        description: Some(format!("{title} doing veri analizi with SQL")),
        job_url: Some(url.to_string()),
        date_posted: None,
    }
}

type TestPipeline = Pipeline<MockScraper, MockEmbedder, MockVectorDb, MockGenerator>;

fn build_pipeline(
    profile: &NamedTempFile,
    scraper: MockScraper,
    fallback: MockReply,
) -> (TestPipeline, ShutdownHandle) {
    let config = Config {
        profile_path: profile.path().to_path_buf(),
        similarity_threshold: 0.0,
        vector_size: DIM as u64,
        ..Config::default()
    };

    let collector = SourceCollector::new(
        Arc::new(scraper),
        config.sites.clone(),
        config.location.clone(),
    );
    let index = JobIndex::new(MockVectorDb::new(), config.collection_name.clone(), DIM as u64);
    let reranker = Reranker::new(
        Arc::new(MockGenerator::new(fallback)),
        RerankerConfig::default(),
    );

    Pipeline::new(collector, Arc::new(MockEmbedder::new(DIM)), index, reranker, config)
}

#[tokio::test]
async fn full_run_produces_ranked_assessed_results() {
    let profile = profile_file("Experienced analyst, strong in SQL and Python.");
    let scraper = MockScraper::new();
    scraper.stub(
        "indeed",
        ANALYST_TERM,
        vec![job("Data Analyst", "https://a/1"), job("BI Analyst", "https://a/2")],
    );

    let (pipeline, _handle) = build_pipeline(&profile, scraper, verdict_reply(75.0, true));
    let report = pipeline.run(RunOptions::default()).await.unwrap();

    assert_eq!(report.outcome, RunOutcome::Completed);
    assert_eq!(report.stats.collected, 2);
    assert_eq!(report.stats.unique, 2);
    assert_eq!(report.stats.indexed, 2);
    assert_eq!(report.stats.matched, 2);
    assert_eq!(report.stats.assessed, 2);
    assert_eq!(report.results.len(), 2);
    assert!(report.results.iter().all(|r| r.verdict.is_some()));
}

#[tokio::test]
async fn rerun_against_the_same_index_is_idempotent() {
    let profile = profile_file("Experienced analyst, strong in SQL and Python.");
    let scraper = MockScraper::new();
    scraper.stub("indeed", ANALYST_TERM, vec![job("Data Analyst", "https://a/1")]);

    let (pipeline, _handle) = build_pipeline(&profile, scraper, verdict_reply(75.0, true));

    let first = pipeline.run(RunOptions::default()).await.unwrap();
    assert_eq!(first.stats.indexed, 1);
    assert_eq!(first.stats.skipped_existing, 0);

    let second = pipeline.run(RunOptions::default()).await.unwrap();
    assert_eq!(second.stats.indexed, 0);
    assert_eq!(second.stats.skipped_existing, 1);
    // The already-indexed posting is still retrievable and ranked.
    assert_eq!(second.stats.matched, 1);
    assert_eq!(second.results.len(), 1);
}

#[tokio::test]
async fn cross_site_duplicates_collapse_to_one_record() {
    let profile = profile_file("Experienced analyst, strong in SQL and Python.");
    let scraper = MockScraper::new();
    // Same title/company/location/description on both sites, different URLs.
    scraper.stub("indeed", ANALYST_TERM, vec![job("Data Analyst", "https://a/1")]);
    scraper.stub("linkedin", ANALYST_TERM, vec![job("Data Analyst", "https://b/1")]);

    let (pipeline, _handle) = build_pipeline(&profile, scraper, verdict_reply(60.0, true));
    let report = pipeline.run(RunOptions::default()).await.unwrap();

    assert_eq!(report.stats.collected, 2);
    assert_eq!(report.stats.unique, 1);
    assert_eq!(report.stats.indexed, 1);
}

#[tokio::test]
async fn missing_profile_halts_the_run() {
    let config = Config {
        profile_path: "/nonexistent/profile.txt".into(),
        vector_size: DIM as u64,
        ..Config::default()
    };
    let collector = SourceCollector::new(
        Arc::new(MockScraper::new()),
        config.sites.clone(),
        config.location.clone(),
    );
    let index = JobIndex::new(MockVectorDb::new(), "jobs", DIM as u64);
    let reranker = Reranker::new(
        Arc::new(MockGenerator::new(verdict_reply(50.0, false))),
        RerankerConfig::default(),
    );
    let (pipeline, _handle) =
        Pipeline::new(collector, Arc::new(MockEmbedder::new(DIM)), index, reranker, config);

    let err = pipeline.run(RunOptions::default()).await.unwrap_err();
    assert!(matches!(err, PipelineError::Profile(_)));
}

#[tokio::test]
async fn empty_collection_ends_normally() {
    let profile = profile_file("Experienced analyst, strong in SQL and Python.");
    // No stubs: every site answers successfully with zero rows.
    let (pipeline, _handle) =
        build_pipeline(&profile, MockScraper::new(), verdict_reply(50.0, false));

    let report = pipeline.run(RunOptions::default()).await.unwrap();
    assert_eq!(report.outcome, RunOutcome::NoPostings);
    assert!(report.results.is_empty());
}

#[tokio::test]
async fn total_collection_failure_reports_no_postings_without_crashing() {
    let profile = profile_file("Experienced analyst, strong in SQL and Python.");
    let scraper = MockScraper::new();
    scraper.fail_site("indeed");
    scraper.fail_site("linkedin");

    let (pipeline, _handle) = build_pipeline(&profile, scraper, verdict_reply(50.0, false));

    let report = pipeline.run(RunOptions::default()).await.unwrap();
    assert_eq!(report.outcome, RunOutcome::NoPostings);
    assert!(report.results.is_empty());
}

#[tokio::test]
async fn similarity_threshold_can_exclude_everything() {
    let profile = profile_file("Experienced analyst, strong in SQL and Python.");
    let scraper = MockScraper::new();
    scraper.stub("indeed", ANALYST_TERM, vec![job("Data Analyst", "https://a/1")]);

    let (pipeline, _handle) = build_pipeline(&profile, scraper, verdict_reply(50.0, true));
    let report = pipeline
        .run(RunOptions {
            similarity_threshold: Some(101.0),
            ..RunOptions::default()
        })
        .await
        .unwrap();

    assert_eq!(report.outcome, RunOutcome::NoMatches);
    assert_eq!(report.stats.indexed, 1);
    assert_eq!(report.stats.matched, 0);
}

#[tokio::test]
async fn rerank_can_be_disabled_per_run() {
    let profile = profile_file("Experienced analyst, strong in SQL and Python.");
    let scraper = MockScraper::new();
    scraper.stub("indeed", ANALYST_TERM, vec![job("Data Analyst", "https://a/1")]);

    let (pipeline, _handle) = build_pipeline(&profile, scraper, verdict_reply(90.0, true));
    let report = pipeline
        .run(RunOptions {
            rerank: Some(false),
            ..RunOptions::default()
        })
        .await
        .unwrap();

    assert_eq!(report.outcome, RunOutcome::Completed);
    assert_eq!(report.stats.assessed, 0);
    assert!(report.results.iter().all(|r| r.verdict.is_none()));
}

#[tokio::test]
async fn rate_limited_rerank_degrades_but_still_ranks() {
    let profile = profile_file("Experienced analyst, strong in SQL and Python.");
    let scraper = MockScraper::new();
    scraper.stub(
        "indeed",
        ANALYST_TERM,
        vec![job("Data Analyst", "https://a/1"), job("BI Analyst", "https://a/2")],
    );

    let (pipeline, _handle) = build_pipeline(&profile, scraper, MockReply::RateLimited);
    let report = pipeline.run(RunOptions::default()).await.unwrap();

    assert_eq!(report.outcome, RunOutcome::Completed);
    assert_eq!(report.results.len(), 2);
    assert!(report.results.iter().all(|r| r.verdict.is_none()));
    assert_eq!(report.stats.degraded, 2);
    assert_eq!(report.stats.assessed, 0);
}

#[tokio::test]
async fn shutdown_before_collection_ends_with_cancelled() {
    let profile = profile_file("Experienced analyst, strong in SQL and Python.");
    let (pipeline, handle) =
        build_pipeline(&profile, MockScraper::new(), verdict_reply(50.0, false));

    handle.shutdown();
    let report = pipeline.run(RunOptions::default()).await.unwrap();
    assert_eq!(report.outcome, RunOutcome::Cancelled);
    assert!(report.results.is_empty());
}

#[tokio::test]
async fn unknown_persona_selection_ends_with_no_personas() {
    let profile = profile_file("Experienced analyst, strong in SQL and Python.");
    let (pipeline, _handle) =
        build_pipeline(&profile, MockScraper::new(), verdict_reply(50.0, false));

    let report = pipeline
        .run(RunOptions {
            personas: Some(vec!["Astronaut".to_string()]),
            ..RunOptions::default()
        })
        .await
        .unwrap();
    assert_eq!(report.outcome, RunOutcome::NoPersonas);
}

fn build_pipeline_with_embedder(
    profile: &NamedTempFile,
    scraper: MockScraper,
    embedder: Arc<MockEmbedder>,
) -> (TestPipeline, ShutdownHandle) {
    let config = Config {
        profile_path: profile.path().to_path_buf(),
        similarity_threshold: 0.0,
        vector_size: DIM as u64,
        ..Config::default()
    };
    let collector = SourceCollector::new(
        Arc::new(scraper),
        config.sites.clone(),
        config.location.clone(),
    );
    let index = JobIndex::new(MockVectorDb::new(), config.collection_name.clone(), DIM as u64);
    let reranker = Reranker::new(
        Arc::new(MockGenerator::new(verdict_reply(50.0, true))),
        RerankerConfig::default(),
    );
    Pipeline::new(collector, embedder, index, reranker, config)
}

#[tokio::test]
async fn per_item_embed_failure_excludes_only_that_item() {
    let profile = profile_file("Experienced analyst, strong in SQL and Python.");
    let scraper = MockScraper::new();
    scraper.stub(
        "indeed",
        ANALYST_TERM,
        vec![job("Data Analyst", "https://a/1"), job("Cursed Analyst", "https://a/2")],
    );

    let embedder = Arc::new(MockEmbedder::new(DIM));
    embedder.fail_containing("Cursed Analyst");
    let (pipeline, _handle) = build_pipeline_with_embedder(&profile, scraper, embedder);

    let report = pipeline.run(RunOptions::default()).await.unwrap();
    assert_eq!(report.outcome, RunOutcome::Completed);
    assert_eq!(report.stats.embed_failures, 1);
    assert_eq!(report.stats.indexed, 1);
    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].scored.record.posting.title, "Data Analyst");
}

#[tokio::test]
async fn profile_embedding_failure_halts_the_run() {
    let profile = profile_file("Experienced analyst, strong in SQL and Python.");
    let embedder = Arc::new(MockEmbedder::new(DIM));
    embedder.set_failing(true);
    let (pipeline, _handle) =
        build_pipeline_with_embedder(&profile, MockScraper::new(), embedder);

    let err = pipeline.run(RunOptions::default()).await.unwrap_err();
    assert!(matches!(err, PipelineError::ProfileEmbedding { .. }));
}
