use std::sync::Arc;

use crate::application::ports::{AudioExtractor, TranscriptionEngine};
use crate::application::services::SummarizePipeline;

pub struct AppState<X, T>
where
    X: AudioExtractor,
    T: TranscriptionEngine,
{
    pub pipeline: Arc<SummarizePipeline<X, T>>,
}

impl<X, T> Clone for AppState<X, T>
where
    X: AudioExtractor,
    T: TranscriptionEngine,
{
    fn clone(&self) -> Self {
        Self {
            pipeline: Arc::clone(&self.pipeline),
        }
    }
}
