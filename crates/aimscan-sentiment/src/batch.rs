//! Sequential batch submission against a completion backend.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::backend::CompletionBackend;

/// How many request lines go into one completion call by default.
pub const DEFAULT_BATCH_SIZE: usize = 5;

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Progress events emitted while batches run, for CLI progress display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    /// About to send batch `index` (0-based) of `total`.
    Sending { index: usize, total: usize },
    /// Batch `index` came back successfully.
    Received { index: usize },
    /// Batch `index` failed; its rows will fall back to defaults.
    Failed { index: usize, error: String },
}

/// Number of batches needed for `row_count` rows at `batch_size`.
/// A zero batch size is treated as one row per batch.
pub fn batch_count(row_count: usize, batch_size: usize) -> usize {
    row_count.div_ceil(batch_size.max(1))
}

/// Send `texts` to `backend` in sequential batches of `batch_size` and
/// return all responses joined with newlines.
///
/// Batches run strictly one after another. A failed batch contributes an
/// empty response and processing continues, so later rows still get
/// analyzed. Cancellation is honored between batches; responses already
/// received are kept.
pub async fn run_batches(
    texts: &[String],
    backend: &dyn CompletionBackend,
    client: &reqwest::Client,
    batch_size: usize,
    timeout: Duration,
    mut progress: impl FnMut(BatchEvent),
    cancel: &CancellationToken,
) -> String {
    let batch_size = batch_size.max(1);
    let total = batch_count(texts.len(), batch_size);
    let mut responses = Vec::with_capacity(total);

    for (index, chunk) in texts.chunks(batch_size).enumerate() {
        if cancel.is_cancelled() {
            tracing::info!(completed = index, total, "analysis cancelled");
            break;
        }

        progress(BatchEvent::Sending { index, total });
        let user_text = chunk.join("\n");

        match backend
            .complete(crate::prompt::SYSTEM_PROMPT, &user_text, client, timeout)
            .await
        {
            Ok(text) => {
                progress(BatchEvent::Received { index });
                responses.push(text);
            }
            Err(error) => {
                tracing::warn!(batch = index, %error, "batch request failed");
                progress(BatchEvent::Failed { index, error });
                responses.push(String::new());
            }
        }
    }

    responses.join("\n")
}
