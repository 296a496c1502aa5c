use std::sync::Arc;

use crate::application::ports::{
    AudioExtractionError, AudioExtractor, TranscriptionEngine, TranscriptionError,
};
use crate::application::services::media_normalizer::{
    MediaNormalizer, NormalizeError, NormalizedAudio,
};
use crate::application::services::summarization_chain::{SummarizationChain, SummarizationError};
use crate::domain::{MediaInput, Summary, Transcript};

/// End-to-end orchestrator: normalize → transcribe → summarize.
///
/// The stages run strictly in order; the first failure aborts the rest and is
/// translated into a single typed error naming the failing stage. Scratch
/// audio created during a run is scoped to that run and released on every
/// exit path. Runs share nothing mutable, so any number may execute
/// concurrently against the same pipeline.
pub struct SummarizePipeline<X, T>
where
    X: AudioExtractor,
    T: TranscriptionEngine,
{
    normalizer: MediaNormalizer<X>,
    engine: Arc<T>,
    chain: Arc<SummarizationChain>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutput {
    pub transcript: Transcript,
    pub summary: Summary,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("unsupported media kind: {0:?}")]
    UnsupportedMediaKind(String),
    #[error("audio extraction failed")]
    ExtractionFailed(#[source] AudioExtractionError),
    #[error("transcription failed")]
    TranscriptionFailed(#[source] TranscriptionError),
    #[error("summarization unavailable")]
    SummarizationUnavailable(#[source] SummarizationError),
}

impl<X, T> SummarizePipeline<X, T>
where
    X: AudioExtractor,
    T: TranscriptionEngine,
{
    pub fn new(extractor: Arc<X>, engine: Arc<T>, chain: Arc<SummarizationChain>) -> Self {
        Self {
            normalizer: MediaNormalizer::new(extractor),
            engine,
            chain,
        }
    }

    #[tracing::instrument(skip(self, input), fields(kind = %input.declared_kind, bytes = input.data.len()))]
    pub async fn run(&self, input: MediaInput) -> Result<PipelineOutput, PipelineError> {
        let normalized = self.normalizer.normalize(input).await.map_err(|e| match e {
            NormalizeError::UnsupportedMediaKind(kind) => PipelineError::UnsupportedMediaKind(kind),
            NormalizeError::Extraction(cause) => PipelineError::ExtractionFailed(cause),
        })?;

        let transcript = match normalized {
            NormalizedAudio::NoAudioTrack => Transcript::NoSpeech,
            NormalizedAudio::Artifact(artifact) => {
                let audio = artifact
                    .bytes()
                    .await
                    .map_err(|e| PipelineError::TranscriptionFailed(e.into()))?;
                let text = self
                    .engine
                    .transcribe(&audio)
                    .await
                    .map_err(PipelineError::TranscriptionFailed)?;
                // Scratch backing (if any) is released when `artifact` drops here.
                Transcript::Speech(text)
            }
        };

        let summary = match &transcript {
            Transcript::NoSpeech => Summary::empty(),
            Transcript::Speech(text) => Summary::new(
                self.chain
                    .summarize(text)
                    .await
                    .map_err(PipelineError::SummarizationUnavailable)?,
            ),
        };

        tracing::info!(
            transcript_chars = transcript.text().len(),
            summary_chars = summary.as_str().len(),
            no_speech = transcript.is_no_speech(),
            "Pipeline run completed"
        );

        Ok(PipelineOutput {
            transcript,
            summary,
        })
    }
}
