//! Completion backend trait and implementations.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// A text-completion service that answers one prompt per call.
///
/// The response is the raw free-text completion; batching and parsing
/// live in [`crate::batch`] and [`crate::parse`]. Errors are plain
/// strings; a failed batch is logged and degrades to defaults, so
/// nothing downstream needs to discriminate failure kinds.
pub trait CompletionBackend: Send + Sync {
    /// The canonical name of this service (e.g., "OpenAI").
    fn name(&self) -> &str;

    /// Request a completion for `user_text` under `system_prompt`.
    fn complete<'a>(
        &'a self,
        system_prompt: &'a str,
        user_text: &'a str,
        client: &'a reqwest::Client,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = Result<String, String>> + Send + 'a>>;
}
