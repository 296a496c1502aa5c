use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use recap::application::ports::{SummaryStrategy, SummaryStrategyError};
use recap::application::services::{SummarizationChain, SummarizationError};
use recap::infrastructure::summarize::FrequencySummarizer;

const FOX_TRANSCRIPT: &str =
    "The quick brown fox jumps. The fox is quick. A slow turtle crawls.";

struct FailingStrategy {
    name: &'static str,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl SummaryStrategy for FailingStrategy {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn summarize(&self, _text: &str) -> Result<String, SummaryStrategyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(SummaryStrategyError::ApiRequestFailed(
            "simulated network error".to_string(),
        ))
    }
}

struct FixedStrategy {
    output: &'static str,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl SummaryStrategy for FixedStrategy {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn summarize(&self, _text: &str) -> Result<String, SummaryStrategyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.output.to_string())
    }
}

fn failing(name: &'static str) -> (Arc<FailingStrategy>, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    (
        Arc::new(FailingStrategy {
            name,
            calls: Arc::clone(&calls),
        }),
        calls,
    )
}

#[tokio::test]
async fn given_first_strategy_succeeds_when_summarizing_then_later_strategies_untouched() {
    let first_calls = Arc::new(AtomicUsize::new(0));
    let (fallback, fallback_calls) = failing("remote");

    let chain = SummarizationChain::new(vec![
        Arc::new(FixedStrategy {
            output: "short version",
            calls: Arc::clone(&first_calls),
        }),
        fallback,
    ]);

    let summary = chain.summarize("some transcript").await.unwrap();

    assert_eq!(summary, "short version");
    assert_eq!(first_calls.load(Ordering::SeqCst), 1);
    assert_eq!(fallback_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn given_remote_and_local_failures_when_summarizing_then_frequency_fallback_succeeds() {
    let (remote, remote_calls) = failing("remote");
    let (local, local_calls) = failing("local-llm");

    let chain = SummarizationChain::new(vec![remote, local, Arc::new(FrequencySummarizer)]);

    let summary = chain.summarize(FOX_TRANSCRIPT).await.unwrap();

    assert!(!summary.is_empty());
    assert_eq!(remote_calls.load(Ordering::SeqCst), 1);
    assert_eq!(local_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn given_all_strategies_fail_when_summarizing_then_exhaustion_names_each_cause() {
    let (remote, _) = failing("remote");
    let (local, _) = failing("local-llm");

    let chain = SummarizationChain::new(vec![remote, local]);

    let err = chain.summarize("anything").await.unwrap_err();
    let SummarizationError::Exhausted { failures } = err;

    assert_eq!(failures.len(), 2);
    assert_eq!(failures[0].strategy, "remote");
    assert_eq!(failures[1].strategy, "local-llm");
}

#[tokio::test]
async fn given_fox_transcript_when_frequency_summarizing_then_keeps_only_high_scoring_sentence() {
    // Term frequencies (stop words removed): quick 2, brown 1, fox 2, jumps 1,
    // slow 1, turtle 1, crawls 1. Sentence scores: 6, 4, 3; mean 4.33, so the
    // 1.2x threshold of 5.2 keeps only the first sentence.
    let summary = FrequencySummarizer.summarize(FOX_TRANSCRIPT).await.unwrap();

    assert_eq!(summary, "The quick brown fox jumps.");
}

#[tokio::test]
async fn given_single_sentence_when_frequency_summarizing_then_returns_it_without_panicking() {
    let summary = FrequencySummarizer
        .summarize("A single sentence about turtles.")
        .await
        .unwrap();

    assert_eq!(summary, "A single sentence about turtles.");
}

#[tokio::test]
async fn given_stop_words_only_when_frequency_summarizing_then_returns_empty_summary() {
    let summary = FrequencySummarizer
        .summarize("It is what it is.")
        .await
        .unwrap();

    assert_eq!(summary, "");
}

#[tokio::test]
async fn given_empty_transcript_when_frequency_summarizing_then_returns_empty_summary() {
    let summary = FrequencySummarizer.summarize("").await.unwrap();

    assert_eq!(summary, "");
}
