mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    EdenAiSettings, LoggingSettings, OllamaSettings, ServerSettings, Settings,
    TranscriptionSettings,
};
