use async_trait::async_trait;

/// One interchangeable summarization algorithm: text in, shorter text out,
/// with its own independent failure mode.
///
/// The chain holds an ordered list of these; a strategy that fails simply
/// hands control to the next one, so implementations should fail after a
/// single attempt rather than retry internally.
#[async_trait]
pub trait SummaryStrategy: Send + Sync {
    /// Stable name used in fallback logs and exhaustion reports.
    fn name(&self) -> &'static str;

    async fn summarize(&self, text: &str) -> Result<String, SummaryStrategyError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SummaryStrategyError {
    #[error("credential not provisioned: {0}")]
    MissingCredential(String),
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
