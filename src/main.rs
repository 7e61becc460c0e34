//! Jobscout CLI entrypoint.

use std::sync::Arc;

use tokio::signal;

use jobscout::collector::{JobSpyApiClient, SourceCollector};
use jobscout::config::Config;
use jobscout::gemini::GeminiClient;
use jobscout::pipeline::{Pipeline, RunOptions, RunOutcome};
use jobscout::rerank::{Reranker, RerankerConfig};
use jobscout::vectordb::{JobIndex, QdrantClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;

    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check(&config).await);
    }

    config.validate()?;
    let options = parse_options(std::env::args().skip(1))?;

    tracing::info!(
        qdrant = %config.qdrant_url,
        scraper = %config.scraper_url,
        collection = %config.collection_name,
        "jobscout starting"
    );

    let gemini = Arc::new(GeminiClient::from_config(&config)?);
    let scraper = Arc::new(JobSpyApiClient::from_config(&config)?);
    let collector = SourceCollector::new(scraper, config.sites.clone(), config.location.clone());

    let qdrant = QdrantClient::new(&config.qdrant_url).await?;
    let index = JobIndex::new(qdrant, config.collection_name.clone(), config.vector_size);

    let reranker_config = RerankerConfig {
        workers: config.rerank_workers,
        temperature: config.rerank_temperature,
        pool_size: config.rerank_pool_size,
        ..RerankerConfig::default()
    };
    let reranker = Reranker::new(Arc::clone(&gemini), reranker_config);

    let (pipeline, shutdown) = Pipeline::new(collector, gemini, index, reranker, config);

    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, stopping after the current stage");
            shutdown.shutdown();
        }
    });

    let report = pipeline.run(options).await?;

    match report.outcome {
        RunOutcome::Completed => {
            tracing::info!(results = report.results.len(), "run finished");
        }
        outcome => {
            tracing::info!(?outcome, "run ended without results");
        }
    }

    Ok(())
}

/// Maps CLI flags onto per-run overrides.
///
/// Recognized flags: `--persona NAME` (repeatable), `--results N`,
/// `--threshold X`, `--no-rerank`.
fn parse_options(args: impl Iterator<Item = String>) -> anyhow::Result<RunOptions> {
    let mut options = RunOptions::default();
    let mut args = args.peekable();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--persona" => {
                let name = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--persona requires a name"))?;
                options.personas.get_or_insert_with(Vec::new).push(name);
            }
            "--results" => {
                let value = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--results requires a number"))?;
                options.results_per_site = Some(value.parse()?);
            }
            "--threshold" => {
                let value = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--threshold requires a number"))?;
                options.similarity_threshold = Some(value.parse()?);
            }
            "--no-rerank" => options.rerank = Some(false),
            other => anyhow::bail!("unrecognized argument '{other}'"),
        }
    }

    Ok(options)
}

async fn run_health_check(config: &Config) -> i32 {
    match QdrantClient::new(&config.qdrant_url).await {
        Ok(client) => match client.health_check().await {
            Ok(()) => 0,
            Err(e) => {
                eprintln!("vector database unhealthy: {e}");
                1
            }
        },
        Err(e) => {
            eprintln!("vector database unreachable: {e}");
            1
        }
    }
}
