use std::borrow::Cow;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

/// Pulls the audio track out of a video container.
///
/// Implementations may write the extracted track to a scratch file; ownership
/// of that file travels with the returned [`AudioArtifact`], whose drop
/// guarantees removal on every exit path.
#[async_trait]
pub trait AudioExtractor: Send + Sync {
    async fn extract_audio(&self, video: &[u8]) -> Result<ExtractedAudio, AudioExtractionError>;
}

/// Outcome of probing a video container for audio.
///
/// A container without any audio stream is a valid outcome, not an error;
/// downstream stages turn it into an explicit "no speech" transcript.
#[derive(Debug)]
pub enum ExtractedAudio {
    Track(AudioArtifact),
    NoAudioTrack,
}

#[derive(Debug, thiserror::Error)]
pub enum AudioExtractionError {
    #[error("media decoder unavailable: {0}")]
    DecoderUnavailable(String),
    #[error("audio extraction failed: {0}")]
    ExtractionFailed(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Audio bytes ready for transcription.
///
/// Pass-through uploads stay in memory; extracted tracks are backed by a
/// scratch file that is removed when the artifact is dropped. An artifact is
/// owned by exactly one pipeline run and never outlives it.
#[derive(Debug)]
pub enum AudioArtifact {
    Buffer(Vec<u8>),
    Scratch(ScratchAudio),
}

impl AudioArtifact {
    pub async fn bytes(&self) -> io::Result<Cow<'_, [u8]>> {
        match self {
            Self::Buffer(data) => Ok(Cow::Borrowed(data)),
            Self::Scratch(scratch) => Ok(Cow::Owned(tokio::fs::read(scratch.path()).await?)),
        }
    }
}

/// Scoped handle to an extracted-audio scratch file.
///
/// Removal is best-effort: a failed delete is logged and never masks the
/// primary result of the run that owned the file.
#[derive(Debug)]
pub struct ScratchAudio {
    path: PathBuf,
}

impl ScratchAudio {
    /// Takes ownership of an already-written scratch file.
    pub fn claim(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchAudio {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "Scratch audio file removed");
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to remove scratch audio file"
                );
            }
        }
    }
}
