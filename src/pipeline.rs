use crate::core::Recommender;
use crate::models::{BusinessRecord, IndexDocument, RecommendationResult, UserQuery};
use crate::services::{ElasticError, IndexSink, RecordSource, SourceError};
use thiserror::Error;
use tracing::info;

/// Fatal per-run errors: a collaborator was unreachable or rejected the run
///
/// Per-record problems never surface here; they are skipped inside the
/// ranking stage.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("bulk source failed: {0}")]
    Source(#[from] SourceError),

    #[error("index sink failed: {0}")]
    Index(#[from] ElasticError),
}

/// Run one recommendation pass: fetch, rank, print, persist
///
/// The ranked result is computed exactly once; it is printed before any
/// index write, so a sink failure can surface as an error without touching
/// or re-triggering the result.
pub async fn run<S, I>(
    source: &S,
    sink: &I,
    recommender: &Recommender,
    query: &UserQuery,
) -> Result<RecommendationResult, PipelineError>
where
    S: RecordSource,
    I: IndexSink,
{
    let raw_records = source.fetch_all().await?;
    info!("Fetched {} records from bulk source", raw_records.len());

    let parsed = raw_records
        .into_iter()
        .map(BusinessRecord::try_from)
        .collect();

    let result = recommender.rank(parsed, query);
    info!(
        "Ranked {} candidates: {} recommended, {} malformed skipped",
        result.total_candidates,
        result.records.len(),
        result.skipped_malformed
    );

    print_results(&result.records);

    for record in &result.records {
        sink.upsert(&IndexDocument::from(record)).await?;
    }
    info!("Persisted {} recommendations to index", result.records.len());

    Ok(result)
}

/// Human-readable output: one `name full_address stars` line per record
fn print_results(records: &[BusinessRecord]) {
    for record in records {
        println!(
            "{} {} {}",
            record.name, record.full_address, record.stars_raw
        );
    }
}
