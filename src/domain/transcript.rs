/// Text produced by the transcription stage, immutable once produced.
///
/// `NoSpeech` marks media that carried no audio track at all. It is distinct
/// from `Speech` with empty text (audio that decoded fine but contained no
/// recognizable words) so callers can render "no speech detected" instead of
/// mistaking it for a pipeline bug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transcript {
    Speech(String),
    NoSpeech,
}

impl Transcript {
    pub fn text(&self) -> &str {
        match self {
            Self::Speech(text) => text,
            Self::NoSpeech => "",
        }
    }

    pub fn is_no_speech(&self) -> bool {
        matches!(self, Self::NoSpeech)
    }
}
