use async_trait::async_trait;

/// Converts an audio byte stream into plain text.
///
/// Engines are loaded once per process and injected; transcription of
/// identical bytes must yield identical text, so failures are surfaced
/// directly rather than retried.
#[async_trait]
pub trait TranscriptionEngine: Send + Sync {
    async fn transcribe(&self, audio_data: &[u8]) -> Result<String, TranscriptionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("audio decoding failed: {0}")]
    DecodingFailed(String),
    #[error("transcription failed: {0}")]
    TranscriptionFailed(String),
    #[error("model loading failed: {0}")]
    ModelLoadFailed(String),
    #[error("audio artifact unreadable: {0}")]
    ArtifactUnreadable(#[from] std::io::Error),
}
