use std::path::PathBuf;

use super::Environment;

/// Runtime settings, assembled from environment variables in `main` (after
/// dotenv loading). Every field has a workable local default except the
/// EdenAI credential, whose absence simply makes the remote strategy fall
/// through at runtime.
#[derive(Debug, Clone)]
pub struct Settings {
    pub environment: Environment,
    pub server: ServerSettings,
    pub transcription: TranscriptionSettings,
    pub eden_ai: EdenAiSettings,
    pub ollama: OllamaSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Upper bound for a media upload. Media runs large, so the default is
    /// far above axum's built-in 2 MiB multipart cap.
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct TranscriptionSettings {
    pub whisper_model: String,
    pub scratch_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct EdenAiSettings {
    pub api_key: String,
    pub providers: Vec<String>,
    pub language: String,
}

#[derive(Debug, Clone)]
pub struct OllamaSettings {
    pub base_url: String,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub json_format: bool,
}

impl Settings {
    pub fn from_env() -> Result<Self, String> {
        let environment = std::env::var("APP_ENV")
            .map(Environment::try_from)
            .unwrap_or(Ok(Environment::Local))?;

        let port = match std::env::var("SERVER_PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| format!("Invalid SERVER_PORT: {}", raw))?,
            Err(_) => 3000,
        };

        let max_upload_mb: usize = match std::env::var("MAX_UPLOAD_MB") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| format!("Invalid MAX_UPLOAD_MB: {}", raw))?,
            Err(_) => 512,
        };

        Ok(Self {
            environment,
            server: ServerSettings {
                host: env_or("SERVER_HOST", "0.0.0.0"),
                port,
                max_upload_bytes: max_upload_mb * 1024 * 1024,
            },
            transcription: TranscriptionSettings {
                whisper_model: env_or("WHISPER_MODEL", "openai/whisper-tiny.en"),
                scratch_dir: PathBuf::from(env_or("SCRATCH_DIR", "/tmp/recap")),
            },
            eden_ai: EdenAiSettings {
                api_key: std::env::var("EDENAI_API_KEY").unwrap_or_default(),
                providers: env_or("EDENAI_PROVIDERS", "microsoft,connexun")
                    .split(',')
                    .map(|p| p.trim().to_string())
                    .filter(|p| !p.is_empty())
                    .collect(),
                language: env_or("EDENAI_LANGUAGE", "en"),
            },
            ollama: OllamaSettings {
                base_url: env_or("OLLAMA_URL", "http://localhost:11434"),
                model: env_or("OLLAMA_MODEL", "llama3.2"),
            },
            logging: LoggingSettings {
                json_format: std::env::var("LOG_FORMAT")
                    .map(|v| v.to_lowercase() == "json")
                    .unwrap_or(false),
            },
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
