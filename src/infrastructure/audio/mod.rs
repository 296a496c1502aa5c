pub mod audio_decoder;
mod ffmpeg_extractor;
mod whisper_engine;

pub use ffmpeg_extractor::FfmpegAudioExtractor;
pub use whisper_engine::WhisperEngine;
