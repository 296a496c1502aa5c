use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use uuid::Uuid;

use crate::application::ports::{
    AudioArtifact, AudioExtractionError, AudioExtractor, ExtractedAudio, ScratchAudio,
};

/// Audio extraction backed by the system `ffmpeg`/`ffprobe` binaries.
///
/// The container is probed first so that "no audio track" can be reported as
/// a valid outcome instead of a decode failure. Extracted tracks land as MP3
/// files in the configured scratch directory; both the staged input and the
/// output are wrapped in scoped handles, so nothing is left behind when a
/// step fails partway.
pub struct FfmpegAudioExtractor {
    scratch_dir: PathBuf,
}

impl FfmpegAudioExtractor {
    pub fn new(scratch_dir: PathBuf) -> io::Result<Self> {
        std::fs::create_dir_all(&scratch_dir)?;
        Ok(Self { scratch_dir })
    }

    fn scratch_path(&self, extension: &str) -> PathBuf {
        self.scratch_dir
            .join(format!("{}.{}", Uuid::new_v4(), extension))
    }

    async fn has_audio_stream(&self, input: &Path) -> Result<bool, AudioExtractionError> {
        let output = Command::new("ffprobe")
            .args(["-v", "error", "-select_streams", "a"])
            .args(["-show_entries", "stream=index"])
            .args(["-of", "csv=p=0"])
            .arg(input)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(map_spawn_error("ffprobe"))?;

        if !output.status.success() {
            return Err(AudioExtractionError::ExtractionFailed(format!(
                "ffprobe exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(!output.stdout.is_empty())
    }
}

#[async_trait]
impl AudioExtractor for FfmpegAudioExtractor {
    async fn extract_audio(&self, video: &[u8]) -> Result<ExtractedAudio, AudioExtractionError> {
        let staged = ScratchAudio::claim(self.scratch_path("input"));
        tokio::fs::write(staged.path(), video).await?;

        if !self.has_audio_stream(staged.path()).await? {
            return Ok(ExtractedAudio::NoAudioTrack);
        }

        // Claimed before ffmpeg runs so a partial output is removed on failure.
        let extracted = ScratchAudio::claim(self.scratch_path("mp3"));

        let output = Command::new("ffmpeg")
            .args(["-y", "-v", "error"])
            .arg("-i")
            .arg(staged.path())
            .args(["-vn", "-acodec", "libmp3lame", "-q:a", "4", "-f", "mp3"])
            .arg(extracted.path())
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(map_spawn_error("ffmpeg"))?;

        if !output.status.success() {
            return Err(AudioExtractionError::ExtractionFailed(format!(
                "ffmpeg exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        tracing::debug!(
            output = %extracted.path().display(),
            "Audio track extracted via ffmpeg"
        );

        Ok(ExtractedAudio::Track(AudioArtifact::Scratch(extracted)))
    }
}

fn map_spawn_error(binary: &'static str) -> impl Fn(io::Error) -> AudioExtractionError {
    move |e| {
        if e.kind() == io::ErrorKind::NotFound {
            AudioExtractionError::DecoderUnavailable(format!("{} binary not found on PATH", binary))
        } else {
            AudioExtractionError::Io(e)
        }
    }
}
