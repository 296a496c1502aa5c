mod eden_ai_summarizer;
mod frequency_summarizer;
mod ollama_summarizer;
mod stop_words;

pub use eden_ai_summarizer::EdenAiSummarizer;
pub use frequency_summarizer::FrequencySummarizer;
pub use ollama_summarizer::OllamaSummarizer;
