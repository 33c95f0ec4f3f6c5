use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::backend::CompletionBackend;

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI-compatible chat-completions backend.
pub struct OpenAiBackend {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl OpenAiBackend {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    /// Point at a different OpenAI-compatible endpoint.
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

impl CompletionBackend for OpenAiBackend {
    fn name(&self) -> &str {
        "OpenAI"
    }

    fn complete<'a>(
        &'a self,
        system_prompt: &'a str,
        user_text: &'a str,
        client: &'a reqwest::Client,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = Result<String, String>> + Send + 'a>> {
        Box::pin(async move {
            let url = format!("{}/chat/completions", self.base_url);
            let body = serde_json::json!({
                "model": self.model,
                "messages": [
                    { "role": "system", "content": system_prompt },
                    { "role": "user", "content": user_text },
                ],
            });

            let resp = client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&body)
                .timeout(timeout)
                .send()
                .await
                .map_err(|e| e.to_string())?;

            let status = resp.status();
            if status.as_u16() == 429 {
                return Err("Rate limited (429)".into());
            }
            if !status.is_success() {
                return Err(format!("HTTP {}", status));
            }

            let data: serde_json::Value = resp.json().await.map_err(|e| e.to_string())?;
            match data["choices"][0]["message"]["content"].as_str() {
                Some(content) => Ok(content.to_string()),
                None => Err("malformed completion response".into()),
            }
        })
    }
}
