//! End-to-end annotation of paragraph rows with analysis columns.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use aimscan_core::{
    DEFAULT_CHANGE, DEFAULT_EXPLANATION, DEFAULT_SENTIMENT, ParagraphRecord, SentimentRecord,
    utc_timestamp,
};

use crate::backend::CompletionBackend;
use crate::batch::{BatchEvent, DEFAULT_BATCH_SIZE, DEFAULT_REQUEST_TIMEOUT, run_batches};
use crate::parse::parse_analysis;
use crate::prompt::prepare_rows;

/// Tunables for one annotation run.
#[derive(Debug, Clone)]
pub struct AnnotateOptions {
    pub batch_size: usize,
    pub request_timeout: Duration,
}

impl Default for AnnotateOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Pad with `default` or truncate so `values` has exactly `len` entries.
fn align_to(mut values: Vec<String>, len: usize, default: &str) -> Vec<String> {
    values.truncate(len);
    while values.len() < len {
        values.push(default.to_string());
    }
    values
}

/// Annotate every record with sentiment, explanation and change columns.
///
/// Records are sorted by year (stable, so same-year rows keep their input
/// order) before being numbered and batched. The output always has exactly
/// one row per input row: parsed vectors are padded with defaults or
/// truncated to fit, and all rows of a run share one timestamp.
pub async fn annotate_records(
    records: &[ParagraphRecord],
    backend: &dyn CompletionBackend,
    client: &reqwest::Client,
    opts: &AnnotateOptions,
    progress: impl FnMut(BatchEvent),
    cancel: &CancellationToken,
) -> Vec<SentimentRecord> {
    let mut sorted: Vec<ParagraphRecord> = records.to_vec();
    sorted.sort_by_key(|r| r.year);

    let texts = prepare_rows(&sorted);
    tracing::info!(
        rows = sorted.len(),
        batch_size = opts.batch_size,
        backend = backend.name(),
        "starting sentiment analysis"
    );

    let response = run_batches(
        &texts,
        backend,
        client,
        opts.batch_size,
        opts.request_timeout,
        progress,
        cancel,
    )
    .await;

    let parsed = parse_analysis(&response);
    if parsed.len() != sorted.len() {
        tracing::warn!(
            parsed = parsed.len(),
            expected = sorted.len(),
            "response count mismatch, missing rows get defaults"
        );
    }

    let n = sorted.len();
    let sentiments = align_to(parsed.sentiments, n, DEFAULT_SENTIMENT);
    let explanations = align_to(parsed.explanations, n, DEFAULT_EXPLANATION);
    let prev_year_changes = align_to(parsed.prev_year_changes, n, DEFAULT_CHANGE);
    let baseline_changes = align_to(parsed.baseline_changes, n, DEFAULT_CHANGE);
    let analysis_date = utc_timestamp();

    sorted
        .into_iter()
        .enumerate()
        .map(|(i, record)| SentimentRecord {
            aim: record.aim,
            year: record.year,
            content: record.content,
            sentiment: sentiments[i].clone(),
            explanation: explanations[i].clone(),
            prev_year_change: prev_year_changes[i].clone(),
            baseline_change: baseline_changes[i].clone(),
            analysis_date: analysis_date.clone(),
        })
        .collect()
}
