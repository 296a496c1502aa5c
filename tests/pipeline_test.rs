use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use uuid::Uuid;

use recap::application::ports::{
    AudioArtifact, AudioExtractionError, AudioExtractor, ExtractedAudio, ScratchAudio,
    SummaryStrategy, SummaryStrategyError, TranscriptionEngine, TranscriptionError,
};
use recap::application::services::{PipelineError, SummarizationChain, SummarizePipeline};
use recap::domain::{MediaInput, Transcript};
use recap::infrastructure::summarize::FrequencySummarizer;

/// Extractor that writes a real scratch file per call, like the ffmpeg
/// adapter does, so leak checks observe genuine filesystem state.
struct ScratchWritingExtractor {
    scratch_dir: PathBuf,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl AudioExtractor for ScratchWritingExtractor {
    async fn extract_audio(&self, video: &[u8]) -> Result<ExtractedAudio, AudioExtractionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let path = self.scratch_dir.join(format!("{}.mp3", Uuid::new_v4()));
        tokio::fs::write(&path, video).await?;
        Ok(ExtractedAudio::Track(AudioArtifact::Scratch(
            ScratchAudio::claim(path),
        )))
    }
}

struct NoTrackExtractor;

#[async_trait]
impl AudioExtractor for NoTrackExtractor {
    async fn extract_audio(&self, _video: &[u8]) -> Result<ExtractedAudio, AudioExtractionError> {
        Ok(ExtractedAudio::NoAudioTrack)
    }
}

struct EchoEngine {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl TranscriptionEngine for EchoEngine {
    async fn transcribe(&self, audio_data: &[u8]) -> Result<String, TranscriptionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(String::from_utf8_lossy(audio_data).into_owned())
    }
}

struct BrokenEngine;

#[async_trait]
impl TranscriptionEngine for BrokenEngine {
    async fn transcribe(&self, _audio_data: &[u8]) -> Result<String, TranscriptionError> {
        Err(TranscriptionError::DecodingFailed(
            "simulated corrupt audio".to_string(),
        ))
    }
}

struct AlwaysFailingStrategy;

#[async_trait]
impl SummaryStrategy for AlwaysFailingStrategy {
    fn name(&self) -> &'static str {
        "always-failing"
    }

    async fn summarize(&self, _text: &str) -> Result<String, SummaryStrategyError> {
        Err(SummaryStrategyError::ApiRequestFailed(
            "simulated outage".to_string(),
        ))
    }
}

fn frequency_chain() -> Arc<SummarizationChain> {
    Arc::new(SummarizationChain::new(vec![Arc::new(FrequencySummarizer)]))
}

fn scratch_file_count(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}

#[tokio::test]
async fn given_audio_input_when_running_then_returns_transcript_and_summary() {
    let scratch = tempfile::tempdir().unwrap();
    let extractor_calls = Arc::new(AtomicUsize::new(0));
    let pipeline = SummarizePipeline::new(
        Arc::new(ScratchWritingExtractor {
            scratch_dir: scratch.path().to_path_buf(),
            calls: Arc::clone(&extractor_calls),
        }),
        Arc::new(EchoEngine {
            calls: Arc::new(AtomicUsize::new(0)),
        }),
        frequency_chain(),
    );

    let text = "The quick brown fox jumps. The fox is quick. A slow turtle crawls.";
    let output = pipeline
        .run(MediaInput::new("audio", text.as_bytes().to_vec()))
        .await
        .unwrap();

    assert_eq!(output.transcript, Transcript::Speech(text.to_string()));
    assert_eq!(output.summary.as_str(), "The quick brown fox jumps.");
    // Audio passes through; the extractor is for video only.
    assert_eq!(extractor_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn given_video_input_when_running_then_extracted_scratch_file_is_removed() {
    let scratch = tempfile::tempdir().unwrap();
    let pipeline = SummarizePipeline::new(
        Arc::new(ScratchWritingExtractor {
            scratch_dir: scratch.path().to_path_buf(),
            calls: Arc::new(AtomicUsize::new(0)),
        }),
        Arc::new(EchoEngine {
            calls: Arc::new(AtomicUsize::new(0)),
        }),
        frequency_chain(),
    );

    let output = pipeline
        .run(MediaInput::new(
            "video",
            b"Spoken words from a clip. Words matter here.".to_vec(),
        ))
        .await
        .unwrap();

    assert!(!output.transcript.text().is_empty());
    assert_eq!(scratch_file_count(scratch.path()), 0);
}

#[tokio::test]
async fn given_unsupported_kind_when_running_then_rejects_before_any_work() {
    let scratch = tempfile::tempdir().unwrap();
    let extractor_calls = Arc::new(AtomicUsize::new(0));
    let engine_calls = Arc::new(AtomicUsize::new(0));
    let pipeline = SummarizePipeline::new(
        Arc::new(ScratchWritingExtractor {
            scratch_dir: scratch.path().to_path_buf(),
            calls: Arc::clone(&extractor_calls),
        }),
        Arc::new(EchoEngine {
            calls: Arc::clone(&engine_calls),
        }),
        frequency_chain(),
    );

    let err = pipeline
        .run(MediaInput::new("image", b"not media".to_vec()))
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::UnsupportedMediaKind(kind) if kind == "image"));
    assert_eq!(extractor_calls.load(Ordering::SeqCst), 0);
    assert_eq!(engine_calls.load(Ordering::SeqCst), 0);
    assert_eq!(scratch_file_count(scratch.path()), 0);
}

#[tokio::test]
async fn given_video_without_audio_track_when_running_then_returns_no_speech_and_empty_summary() {
    let pipeline = SummarizePipeline::new(
        Arc::new(NoTrackExtractor),
        Arc::new(EchoEngine {
            calls: Arc::new(AtomicUsize::new(0)),
        }),
        frequency_chain(),
    );

    let output = pipeline
        .run(MediaInput::new("video", b"silent clip".to_vec()))
        .await
        .unwrap();

    assert!(output.transcript.is_no_speech());
    assert_eq!(output.transcript.text(), "");
    assert_eq!(output.summary.as_str(), "");
}

#[tokio::test]
async fn given_extraction_failure_when_running_then_no_scratch_files_leak() {
    struct FailingExtractor {
        scratch_dir: PathBuf,
    }

    #[async_trait]
    impl AudioExtractor for FailingExtractor {
        async fn extract_audio(
            &self,
            video: &[u8],
        ) -> Result<ExtractedAudio, AudioExtractionError> {
            // Stages its input like the real adapter, then fails partway;
            // the scoped handle must still remove the staged file.
            let staged = ScratchAudio::claim(self.scratch_dir.join("staged.input"));
            tokio::fs::write(staged.path(), video).await?;
            Err(AudioExtractionError::ExtractionFailed(
                "simulated ffmpeg crash".to_string(),
            ))
        }
    }

    let scratch = tempfile::tempdir().unwrap();
    let pipeline = SummarizePipeline::new(
        Arc::new(FailingExtractor {
            scratch_dir: scratch.path().to_path_buf(),
        }),
        Arc::new(EchoEngine {
            calls: Arc::new(AtomicUsize::new(0)),
        }),
        frequency_chain(),
    );

    let err = pipeline
        .run(MediaInput::new("video", b"broken container".to_vec()))
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::ExtractionFailed(_)));
    assert_eq!(scratch_file_count(scratch.path()), 0);
}

#[tokio::test]
async fn given_transcription_failure_when_running_then_no_scratch_files_leak() {
    let scratch = tempfile::tempdir().unwrap();
    let pipeline = SummarizePipeline::new(
        Arc::new(ScratchWritingExtractor {
            scratch_dir: scratch.path().to_path_buf(),
            calls: Arc::new(AtomicUsize::new(0)),
        }),
        Arc::new(BrokenEngine),
        frequency_chain(),
    );

    let err = pipeline
        .run(MediaInput::new("video", b"video bytes".to_vec()))
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::TranscriptionFailed(_)));
    assert_eq!(scratch_file_count(scratch.path()), 0);
}

#[tokio::test]
async fn given_summarization_failure_when_running_then_whole_run_fails_without_leaks() {
    let scratch = tempfile::tempdir().unwrap();
    let pipeline = SummarizePipeline::new(
        Arc::new(ScratchWritingExtractor {
            scratch_dir: scratch.path().to_path_buf(),
            calls: Arc::new(AtomicUsize::new(0)),
        }),
        Arc::new(EchoEngine {
            calls: Arc::new(AtomicUsize::new(0)),
        }),
        Arc::new(SummarizationChain::new(vec![Arc::new(
            AlwaysFailingStrategy,
        )])),
    );

    let err = pipeline
        .run(MediaInput::new("video", b"Some speech here.".to_vec()))
        .await
        .unwrap_err();

    // No partial result: the transcript is not surfaced alongside the failure.
    assert!(matches!(err, PipelineError::SummarizationUnavailable(_)));
    assert_eq!(scratch_file_count(scratch.path()), 0);
}

#[tokio::test]
async fn given_identical_audio_when_transcribing_twice_then_transcripts_match() {
    let engine = EchoEngine {
        calls: Arc::new(AtomicUsize::new(0)),
    };
    let audio = b"deterministic input bytes";

    let first = engine.transcribe(audio).await.unwrap();
    let second = engine.transcribe(audio).await.unwrap();

    assert_eq!(first, second);
}
