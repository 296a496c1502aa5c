use std::fmt;
use std::sync::Arc;

use crate::application::ports::{SummaryStrategy, SummaryStrategyError};

/// Ordered list of summarization strategies tried in sequence until one
/// succeeds.
///
/// Each strategy gets exactly one attempt; a failure is logged and control
/// falls through to the next entry. The chain as a whole fails only when
/// every strategy has failed, and the exhaustion error carries every
/// per-strategy cause so the outcome is actionable without re-running.
pub struct SummarizationChain {
    strategies: Vec<Arc<dyn SummaryStrategy>>,
}

impl SummarizationChain {
    pub fn new(strategies: Vec<Arc<dyn SummaryStrategy>>) -> Self {
        Self { strategies }
    }

    pub async fn summarize(&self, text: &str) -> Result<String, SummarizationError> {
        let mut failures = Vec::new();

        for strategy in &self.strategies {
            match strategy.summarize(text).await {
                Ok(summary) => {
                    tracing::info!(
                        strategy = strategy.name(),
                        chars = summary.len(),
                        "Summarization strategy succeeded"
                    );
                    return Ok(summary);
                }
                Err(e) => {
                    tracing::warn!(
                        strategy = strategy.name(),
                        error = %e,
                        "Summarization strategy failed, falling through"
                    );
                    failures.push(StrategyFailure {
                        strategy: strategy.name(),
                        cause: e,
                    });
                }
            }
        }

        Err(SummarizationError::Exhausted { failures })
    }
}

#[derive(Debug)]
pub struct StrategyFailure {
    pub strategy: &'static str,
    pub cause: SummaryStrategyError,
}

#[derive(Debug, thiserror::Error)]
pub enum SummarizationError {
    #[error("all summarization strategies failed: {}", FailureList(.failures.as_slice()))]
    Exhausted { failures: Vec<StrategyFailure> },
}

struct FailureList<'a>(&'a [StrategyFailure]);

impl fmt::Display for FailureList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "no strategies configured");
        }
        for (i, failure) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", failure.strategy, failure.cause)?;
        }
        Ok(())
    }
}
