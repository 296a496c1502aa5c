use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::application::ports::{SummaryStrategy, SummaryStrategyError};

const DEFAULT_BASE_URL: &str = "https://api.edenai.run/v2";

/// Remote summarization via the EdenAI text API.
///
/// One request per attempt; any failure (missing credential, non-2xx,
/// network error, unexpected payload shape) fails the strategy and lets the
/// chain fall through, rather than hammering a slow or unreachable provider.
pub struct EdenAiSummarizer {
    client: Client,
    base_url: String,
    api_key: String,
    providers: Vec<String>,
    language: String,
}

impl EdenAiSummarizer {
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(api_key: String, providers: Vec<String>, language: String) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, api_key, providers, language)
    }

    pub fn with_base_url(
        base_url: &str,
        api_key: String,
        providers: Vec<String>,
        language: String,
    ) -> Self {
        let client = Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .build()
            .expect("reqwest client build never fails with valid TLS config");
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            providers,
            language,
        }
    }
}

#[async_trait]
impl SummaryStrategy for EdenAiSummarizer {
    fn name(&self) -> &'static str {
        "eden-ai"
    }

    #[tracing::instrument(skip(self, text), fields(chars = text.len()))]
    async fn summarize(&self, text: &str) -> Result<String, SummaryStrategyError> {
        if self.api_key.is_empty() {
            return Err(SummaryStrategyError::MissingCredential(
                "EDENAI_API_KEY is not set".to_string(),
            ));
        }

        let url = format!("{}/text/summarize", self.base_url);
        let body = serde_json::json!({
            "providers": self.providers.join(","),
            "language": self.language,
            "text": text,
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
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

        let payload: Value = response
            .json()
            .await
            .map_err(|e| SummaryStrategyError::InvalidResponse(format!("parse: {}", e)))?;

        // The response is keyed by provider; read the first configured one.
        let provider = self.providers.first().ok_or_else(|| {
            SummaryStrategyError::InvalidResponse("no providers configured".to_string())
        })?;

        let result = payload
            .get(provider)
            .and_then(|entry| entry.get("result"))
            .and_then(Value::as_str)
            .ok_or_else(|| {
                SummaryStrategyError::InvalidResponse(format!(
                    "no result for provider {:?} in response",
                    provider
                ))
            })?;

        Ok(result.to_string())
    }
}
