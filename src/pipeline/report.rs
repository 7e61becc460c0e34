use std::collections::BTreeMap;

use tracing::info;

use super::context::PipelineReport;

/// How many ranked entries the summary prints.
const REPORT_TOP_N: usize = 10;

/// Logs the ranked shortlist and run statistics.
pub(super) fn log_report(report: &PipelineReport) {
    let stats = &report.stats;
    info!(
        outcome = ?report.outcome,
        collected = stats.collected,
        unique = stats.unique,
        indexed = stats.indexed,
        skipped_existing = stats.skipped_existing,
        embed_failures = stats.embed_failures,
        matched = stats.matched,
        assessed = stats.assessed,
        degraded = stats.degraded,
        "run summary"
    );

    for (rank, result) in report.results.iter().take(REPORT_TOP_N).enumerate() {
        let posting = &result.scored.record.posting;
        info!(
            rank = rank + 1,
            title = %posting.title,
            company = %posting.company,
            site = %posting.source_site,
            similarity = result.scored.similarity_score,
            heuristic = result.scored.heuristic_score,
            fit = result.verdict.as_ref().map(|v| v.fit_score),
            recommended = result.verdict.as_ref().map(|v| v.is_recommended),
            "ranked result"
        );
    }

    if !report.results.is_empty() {
        let mut per_persona: BTreeMap<&str, usize> = BTreeMap::new();
        for result in &report.results {
            *per_persona
                .entry(result.scored.record.posting.persona_source.as_str())
                .or_default() += 1;
        }
        for (persona, count) in per_persona {
            info!(persona, count, "persona contribution");
        }
    }
}
