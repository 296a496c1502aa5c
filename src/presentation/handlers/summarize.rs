use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::application::ports::{AudioExtractor, TranscriptionEngine};
use crate::application::services::PipelineError;
use crate::domain::{MediaInput, MediaKind};
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct SummarizeResponse {
    pub transcription: String,
    pub summary: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub category: String,
    pub error: String,
}

/// Accepts a multipart upload: a `file` part with the media bytes, plus an
/// optional `kind` text part (`audio`/`video`). Without an explicit `kind`
/// the file part's content type decides. The declared kind is forwarded to
/// the pipeline verbatim so an unsupported value is rejected there, before
/// any work happens.
#[tracing::instrument(skip(state, multipart))]
pub async fn summarize_handler<X, T>(
    State(state): State<AppState<X, T>>,
    mut multipart: Multipart,
) -> impl IntoResponse
where
    X: AudioExtractor + 'static,
    T: TranscriptionEngine + 'static,
{
    let mut file_data: Option<Vec<u8>> = None;
    let mut declared_kind: Option<String> = None;
    let mut mime_kind: Option<MediaKind> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(f)) => f,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read multipart body");
                return bad_request(format!("Failed to read multipart: {}", e));
            }
        };

        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                mime_kind = field.content_type().and_then(MediaKind::from_mime);
                match field.bytes().await {
                    Ok(data) => file_data = Some(data.to_vec()),
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to read file bytes");
                        return bad_request(format!("Failed to read file: {}", e));
                    }
                }
            }
            Some("kind") => match field.text().await {
                Ok(text) => declared_kind = Some(text),
                Err(e) => return bad_request(format!("Failed to read kind field: {}", e)),
            },
            _ => continue,
        }
    }

    let Some(data) = file_data else {
        tracing::warn!("Summarize request without a file part");
        return bad_request("No file uploaded".to_string());
    };

    let Some(kind) = declared_kind.or_else(|| mime_kind.map(|k| k.as_str().to_string())) else {
        tracing::warn!("Summarize request without a declared media kind");
        return bad_request(
            "Media kind is undeclared: provide a 'kind' field or a typed file part".to_string(),
        );
    };

    tracing::debug!(kind = %kind, bytes = data.len(), "Processing media upload");

    match state.pipeline.run(MediaInput::new(kind, data)).await {
        Ok(output) => (
            StatusCode::OK,
            Json(SummarizeResponse {
                transcription: output.transcript.text().to_string(),
                summary: output.summary.into_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %error_chain(&e), "Pipeline run failed");
            let (status, category) = match &e {
                PipelineError::UnsupportedMediaKind(_) => {
                    (StatusCode::UNSUPPORTED_MEDIA_TYPE, "unsupported_media_kind")
                }
                PipelineError::ExtractionFailed(_) => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "extraction_failed")
                }
                PipelineError::TranscriptionFailed(_) => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "transcription_failed")
                }
                PipelineError::SummarizationUnavailable(_) => {
                    (StatusCode::BAD_GATEWAY, "summarization_unavailable")
                }
            };
            (
                status,
                Json(ErrorResponse {
                    category: category.to_string(),
                    error: error_chain(&e),
                }),
            )
                .into_response()
        }
    }
}

fn bad_request(message: String) -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            category: "bad_request".to_string(),
            error: message,
        }),
    )
        .into_response()
}

fn error_chain(error: &dyn std::error::Error) -> String {
    let mut rendered = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}
