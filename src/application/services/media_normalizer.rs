use std::sync::Arc;

use crate::application::ports::{
    AudioArtifact, AudioExtractionError, AudioExtractor, ExtractedAudio,
};
use crate::domain::{MediaInput, MediaKind};

/// Turns an arbitrary media upload into a single audio artifact.
///
/// Audio uploads pass through untouched; video uploads go to the extractor,
/// which may report that the container carries no audio track at all. An
/// undeclarable kind is rejected before any decoding work or scratch file is
/// created.
pub struct MediaNormalizer<X>
where
    X: AudioExtractor,
{
    extractor: Arc<X>,
}

#[derive(Debug)]
pub enum NormalizedAudio {
    Artifact(AudioArtifact),
    NoAudioTrack,
}

#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("unsupported media kind: {0:?}")]
    UnsupportedMediaKind(String),
    #[error("extraction: {0}")]
    Extraction(#[from] AudioExtractionError),
}

impl<X> MediaNormalizer<X>
where
    X: AudioExtractor,
{
    pub fn new(extractor: Arc<X>) -> Self {
        Self { extractor }
    }

    /// Consumes the input so an audio upload's buffer moves straight into
    /// the artifact instead of being copied.
    pub async fn normalize(&self, input: MediaInput) -> Result<NormalizedAudio, NormalizeError> {
        let kind = MediaKind::resolve(&input.declared_kind)
            .ok_or(NormalizeError::UnsupportedMediaKind(input.declared_kind))?;

        match kind {
            MediaKind::Audio => {
                tracing::debug!(bytes = input.data.len(), "Audio upload passed through");
                Ok(NormalizedAudio::Artifact(AudioArtifact::Buffer(input.data)))
            }
            MediaKind::Video => match self.extractor.extract_audio(&input.data).await? {
                ExtractedAudio::Track(artifact) => {
                    tracing::debug!("Audio track extracted from video container");
                    Ok(NormalizedAudio::Artifact(artifact))
                }
                ExtractedAudio::NoAudioTrack => {
                    tracing::info!("Video container has no audio track");
                    Ok(NormalizedAudio::NoAudioTrack)
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct RejectingExtractor;

    #[async_trait]
    impl AudioExtractor for RejectingExtractor {
        async fn extract_audio(
            &self,
            _video: &[u8],
        ) -> Result<ExtractedAudio, AudioExtractionError> {
            Err(AudioExtractionError::ExtractionFailed(
                "extractor must not run for these inputs".to_string(),
            ))
        }
    }

    #[tokio::test]
    async fn given_audio_input_when_normalizing_then_buffer_moves_without_copying() {
        let data = b"pass-through audio bytes".to_vec();
        let original_ptr = data.as_ptr();
        let normalizer = MediaNormalizer::new(Arc::new(RejectingExtractor));

        let normalized = normalizer
            .normalize(MediaInput::new("audio", data))
            .await
            .unwrap();

        match normalized {
            NormalizedAudio::Artifact(AudioArtifact::Buffer(bytes)) => {
                assert_eq!(bytes.as_ptr(), original_ptr);
            }
            other => panic!("expected pass-through buffer, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn given_unknown_kind_when_normalizing_then_reports_declared_kind() {
        let normalizer = MediaNormalizer::new(Arc::new(RejectingExtractor));

        let err = normalizer
            .normalize(MediaInput::new("image", Vec::new()))
            .await
            .unwrap_err();

        assert!(matches!(err, NormalizeError::UnsupportedMediaKind(kind) if kind == "image"));
    }
}
