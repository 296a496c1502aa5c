use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::application::ports::{SummaryStrategy, SummaryStrategyError};

/// Summarization through a locally hosted Ollama instance.
///
/// The transcript goes out as a single chat prompt and the model response
/// comes back verbatim. An unreachable daemon or malformed reply fails the
/// strategy after one attempt so the chain can fall through.
pub struct OllamaSummarizer {
    client: Client,
    base_url: String,
    model: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

impl OllamaSummarizer {
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

    pub fn new(base_url: &str, model: &str) -> Self {
        let client = Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .build()
            .expect("reqwest client build never fails with valid TLS config");
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl SummaryStrategy for OllamaSummarizer {
    fn name(&self) -> &'static str {
        "ollama"
    }

    #[tracing::instrument(skip(self, text), fields(model = %self.model, chars = text.len()))]
    async fn summarize(&self, text: &str) -> Result<String, SummaryStrategyError> {
        let url = format!("{}/api/chat", self.base_url);
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {
                    "role": "user",
                    "content": format!("Summarize the following: {}", text),
                }
            ],
            "stream": false,
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| SummaryStrategyError::ApiRequestFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(SummaryStrategyError::ApiRequestFailed(format!(
                "status {}: {}",
                status, detail
            )));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| SummaryStrategyError::InvalidResponse(format!("parse: {}", e)))?;

        Ok(chat.message.content)
    }
}
