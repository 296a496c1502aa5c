mod audio_extractor;
mod summary_strategy;
mod transcription_engine;

pub use audio_extractor::{
    AudioArtifact, AudioExtractionError, AudioExtractor, ExtractedAudio, ScratchAudio,
};
pub use summary_strategy::{SummaryStrategy, SummaryStrategyError};
pub use transcription_engine::{TranscriptionEngine, TranscriptionError};
