mod media_normalizer;
mod pipeline;
mod summarization_chain;

pub use media_normalizer::{MediaNormalizer, NormalizeError, NormalizedAudio};
pub use pipeline::{PipelineError, PipelineOutput, SummarizePipeline};
pub use summarization_chain::{StrategyFailure, SummarizationChain, SummarizationError};
