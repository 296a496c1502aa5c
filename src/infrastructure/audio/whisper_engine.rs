use async_trait::async_trait;
use candle_core::{Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::whisper::{self as whisper, Config};
use hf_hub::api::sync::Api;
use hf_hub::{Repo, RepoType};
use tokenizers::Tokenizer;
use tokio::sync::Mutex;

use crate::application::ports::{TranscriptionEngine, TranscriptionError};

use super::audio_decoder::decode_to_pcm;

const MEL_FILTERS_REPO: &str = "FL33TW00D-HF/whisper-base";
const MAX_DECODE_TOKENS: usize = 224;

/// Local Whisper inference via candle.
///
/// Weights are fetched from the Hugging Face hub and loaded exactly once, at
/// construction; the engine is then shared process-wide behind an `Arc`.
/// Candle's decoder mutates its kv-cache, so inference itself is serialized
/// behind a `Mutex` while everything else stays read-only.
pub struct WhisperEngine {
    model: Mutex<whisper::model::Whisper>,
    tokenizer: Tokenizer,
    config: Config,
    device: Device,
    mel_filters: Vec<f32>,
}

impl WhisperEngine {
    pub fn new(model_id: &str) -> Result<Self, TranscriptionError> {
        let device = Device::Cpu;

        tracing::info!(model = model_id, "Loading Whisper transcription model");

        let api = Api::new().map_err(|e| load_err("hub api", e))?;
        let repo = api.repo(Repo::new(model_id.to_string(), RepoType::Model));

        let config_path = repo
            .get("config.json")
            .map_err(|e| load_err("config.json", e))?;
        let tokenizer_path = repo
            .get("tokenizer.json")
            .map_err(|e| load_err("tokenizer.json", e))?;
        let weights_path = repo
            .get("model.safetensors")
            .map_err(|e| load_err("model.safetensors", e))?;
        let mel_path = api
            .repo(Repo::new(MEL_FILTERS_REPO.to_string(), RepoType::Model))
            .get("melfilters.bytes")
            .map_err(|e| load_err("melfilters.bytes", e))?;

        let config: Config = serde_json::from_str(
            &std::fs::read_to_string(&config_path).map_err(|e| load_err("read config", e))?,
        )
        .map_err(|e| load_err("parse config", e))?;

        let tokenizer =
            Tokenizer::from_file(&tokenizer_path).map_err(|e| load_err("tokenizer", e))?;

        let mel_bytes = std::fs::read(&mel_path).map_err(|e| load_err("mel filters", e))?;
        let mel_filters = parse_mel_filters(&mel_bytes, &config)?;

        // SAFETY: safetensors files are memory-mapped read-only
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], whisper::DTYPE, &device)
                .map_err(|e| load_err("weights", e))?
        };

        let model =
            whisper::model::Whisper::load(&vb, config.clone()).map_err(|e| load_err("model", e))?;

        tracing::info!("Whisper model loaded");

        Ok(Self {
            model: Mutex::new(model),
            tokenizer,
            config,
            device,
            mel_filters,
        })
    }

    fn mel_spectrogram(&self, samples: &[f32]) -> Result<Tensor, TranscriptionError> {
        let mel = whisper::audio::pcm_to_mel(&self.config, samples, &self.mel_filters);
        let n_mel = self.config.num_mel_bins;
        let n_frames = mel.len() / n_mel;
        Tensor::from_vec(mel, (1, n_mel, n_frames), &self.device)
            .map_err(|e| infer_err("mel tensor", e))
    }
}

#[async_trait]
impl TranscriptionEngine for WhisperEngine {
    async fn transcribe(&self, audio_data: &[u8]) -> Result<String, TranscriptionError> {
        let pcm = decode_to_pcm(audio_data)?;

        // Whisper processes fixed 30s windows; pad the tail chunk with silence.
        let mut mels = Vec::new();
        for chunk in pcm.chunks(whisper::N_SAMPLES) {
            let window = if chunk.len() < whisper::N_SAMPLES {
                let mut padded = chunk.to_vec();
                padded.resize(whisper::N_SAMPLES, 0.0);
                self.mel_spectrogram(&padded)?
            } else {
                self.mel_spectrogram(chunk)?
            };
            mels.push(window);
        }

        let mut model = self.model.lock().await;
        let mut segments = Vec::new();

        for (i, mel) in mels.iter().enumerate() {
            tracing::debug!(segment = i, "Decoding audio segment");
            let text = greedy_decode(&mut model, &self.tokenizer, &self.device, mel)?;
            if !text.is_empty() {
                segments.push(text);
            }
        }

        let transcript = segments.join(" ");

        tracing::info!(
            segments = segments.len(),
            chars = transcript.len(),
            "Transcription completed"
        );

        Ok(transcript)
    }
}

fn greedy_decode(
    model: &mut whisper::model::Whisper,
    tokenizer: &Tokenizer,
    device: &Device,
    mel: &Tensor,
) -> Result<String, TranscriptionError> {
    let sot = token_id(tokenizer, whisper::SOT_TOKEN)?;
    let transcribe = token_id(tokenizer, whisper::TRANSCRIBE_TOKEN)?;
    let no_timestamps = token_id(tokenizer, whisper::NO_TIMESTAMPS_TOKEN)?;
    let eot = token_id(tokenizer, whisper::EOT_TOKEN)?;

    let audio_features = model
        .encoder
        .forward(mel, true)
        .map_err(|e| infer_err("encoder", e))?;

    let mut tokens = vec![sot, transcribe, no_timestamps];
    let mut text = String::new();

    for _ in 0..MAX_DECODE_TOKENS {
        let input = Tensor::new(tokens.as_slice(), device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(|e| infer_err("token tensor", e))?;

        let decoded = model
            .decoder
            .forward(&input, &audio_features, tokens.len() == 3)
            .map_err(|e| infer_err("decoder", e))?;

        let logits = decoded
            .squeeze(0)
            .and_then(|t| model.decoder.final_linear(&t))
            .map_err(|e| infer_err("final linear", e))?;

        let next = logits
            .dim(0)
            .and_then(|len| logits.get(len - 1))
            .and_then(|last| last.argmax(0))
            .and_then(|t| t.to_scalar::<u32>())
            .map_err(|e| infer_err("argmax", e))?;

        if next == eot {
            break;
        }

        tokens.push(next);

        if let Some(piece) = tokenizer.id_to_token(next) {
            text.push_str(&piece.replace('Ġ', " ").replace('▁', " "));
        }
    }

    model.reset_kv_cache();

    Ok(text.trim().to_string())
}

fn token_id(tokenizer: &Tokenizer, token: &str) -> Result<u32, TranscriptionError> {
    tokenizer
        .token_to_id(token)
        .ok_or_else(|| TranscriptionError::TranscriptionFailed(format!("token not found: {}", token)))
}

fn parse_mel_filters(bytes: &[u8], config: &Config) -> Result<Vec<f32>, TranscriptionError> {
    let expected = config.num_mel_bins * (whisper::N_FFT / 2 + 1);
    if bytes.len() < expected * 4 {
        return Err(TranscriptionError::ModelLoadFailed(format!(
            "mel filters file too small: {} bytes, expected at least {}",
            bytes.len(),
            expected * 4
        )));
    }

    Ok(bytes
        .chunks_exact(4)
        .take(expected)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

fn load_err(stage: &str, e: impl std::fmt::Display) -> TranscriptionError {
    TranscriptionError::ModelLoadFailed(format!("{}: {}", stage, e))
}

fn infer_err(stage: &str, e: impl std::fmt::Display) -> TranscriptionError {
    TranscriptionError::TranscriptionFailed(format!("{}: {}", stage, e))
}
