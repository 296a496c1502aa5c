use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use recap::application::ports::SummaryStrategy;
use recap::application::services::{SummarizationChain, SummarizePipeline};
use recap::infrastructure::audio::{FfmpegAudioExtractor, WhisperEngine};
use recap::infrastructure::observability::{TracingConfig, init_tracing};
use recap::infrastructure::summarize::{EdenAiSummarizer, FrequencySummarizer, OllamaSummarizer};
use recap::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env().map_err(anyhow::Error::msg)?;

    init_tracing(
        TracingConfig {
            environment: settings.environment.to_string(),
            json_format: settings.logging.json_format || settings.environment == Environment::Prod,
        },
        settings.server.port,
    );

    let extractor = Arc::new(
        FfmpegAudioExtractor::new(settings.transcription.scratch_dir.clone())
            .context("creating scratch directory")?,
    );

    let model_id = settings.transcription.whisper_model.clone();
    let engine = tokio::task::spawn_blocking(move || WhisperEngine::new(&model_id))
        .await
        .context("whisper engine load task")?
        .context("loading whisper model")?;
    let engine = Arc::new(engine);

    let strategies: Vec<Arc<dyn SummaryStrategy>> = vec![
        Arc::new(EdenAiSummarizer::new(
            settings.eden_ai.api_key.clone(),
            settings.eden_ai.providers.clone(),
            settings.eden_ai.language.clone(),
        )),
        Arc::new(OllamaSummarizer::new(
            &settings.ollama.base_url,
            &settings.ollama.model,
        )),
        Arc::new(FrequencySummarizer),
    ];
    let chain = Arc::new(SummarizationChain::new(strategies));

    let pipeline = Arc::new(SummarizePipeline::new(extractor, engine, chain));

    let router = create_router(AppState { pipeline }, settings.server.max_upload_bytes);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("parsing server address")?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
