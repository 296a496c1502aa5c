use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::application::ports::{AudioExtractor, TranscriptionEngine};
use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{health_handler, summarize_handler};
use crate::presentation::state::AppState;

/// `max_upload_bytes` replaces axum's 2 MiB default body cap on the
/// summarize route; real audio and video uploads blow straight through it.
pub fn create_router<X, T>(state: AppState<X, T>, max_upload_bytes: usize) -> Router
where
    X: AudioExtractor + 'static,
    T: TranscriptionEngine + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route(
            "/api/v1/summarize",
            post(summarize_handler::<X, T>)
                .route_layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/health", get(health_handler))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
