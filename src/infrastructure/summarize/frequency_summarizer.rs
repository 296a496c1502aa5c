use std::collections::HashMap;

use async_trait::async_trait;

use crate::application::ports::{SummaryStrategy, SummaryStrategyError};

use super::stop_words::STOP_WORDS;

/// Sentences scoring above this multiple of the mean survive into the summary.
const SCORE_THRESHOLD: f64 = 1.2;

/// Term-frequency extractive summarizer, the fallback of last resort.
///
/// No external dependency and no failure mode on well-formed text: every
/// sentence is scored as the sum of its non-stop-word term frequencies, and
/// sentences scoring above 1.2x the mean are kept in their original order.
/// A transcript with no scorable sentences yields an empty summary rather
/// than an error.
pub struct FrequencySummarizer;

#[async_trait]
impl SummaryStrategy for FrequencySummarizer {
    fn name(&self) -> &'static str {
        "frequency"
    }

    async fn summarize(&self, text: &str) -> Result<String, SummaryStrategyError> {
        Ok(extract_summary(text))
    }
}

fn extract_summary(text: &str) -> String {
    let sentences = split_sentences(text);
    if sentences.is_empty() {
        return String::new();
    }

    let frequencies = term_frequencies(text);

    let scores: Vec<f64> = sentences
        .iter()
        .map(|s| sentence_score(s, &frequencies))
        .collect();

    // A lone sentence is its own summary, provided it scored at all.
    if sentences.len() == 1 {
        return if scores[0] > 0.0 {
            sentences.into_iter().next().unwrap_or_default()
        } else {
            String::new()
        };
    }

    // Guarded above: at least one sentence exists, so the mean is defined.
    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    let threshold = SCORE_THRESHOLD * mean;

    let mut kept = Vec::new();
    for (sentence, &score) in sentences.iter().zip(&scores) {
        if score > threshold && score > 0.0 {
            kept.push(sentence.as_str());
        }
    }
    kept.join(" ")
}

/// Splits on sentence-ending punctuation, keeping the terminator attached.
fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();

    for ch in text.chars() {
        current.push(ch);
        if matches!(ch, '.' | '!' | '?') {
            let trimmed = current.trim();
            if !trimmed.is_empty() {
                sentences.push(trimmed.to_string());
            }
            current.clear();
        }
    }

    let tail = current.trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }

    sentences
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
}

fn term_frequencies(text: &str) -> HashMap<String, u32> {
    let mut table = HashMap::new();
    for word in tokenize(text) {
        if STOP_WORDS.contains(&word.as_str()) {
            continue;
        }
        *table.entry(word).or_insert(0) += 1;
    }
    table
}

fn sentence_score(sentence: &str, frequencies: &HashMap<String, u32>) -> f64 {
    tokenize(sentence)
        .filter_map(|word| frequencies.get(&word))
        .map(|&freq| freq as f64)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_text_when_splitting_sentences_then_keeps_terminators_and_order() {
        let sentences = split_sentences("One here. Two there! Three?");
        assert_eq!(sentences, vec!["One here.", "Two there!", "Three?"]);
    }

    #[test]
    fn given_unterminated_tail_when_splitting_then_tail_is_a_sentence() {
        let sentences = split_sentences("Complete sentence. trailing fragment");
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[1], "trailing fragment");
    }

    #[test]
    fn given_stop_words_when_building_frequencies_then_they_are_excluded() {
        let table = term_frequencies("the quick fox and the slow fox");
        assert_eq!(table.get("fox"), Some(&2));
        assert_eq!(table.get("the"), None);
        assert_eq!(table.get("and"), None);
    }

    #[test]
    fn given_empty_text_when_summarizing_then_returns_empty_without_panicking() {
        assert_eq!(extract_summary(""), "");
        assert_eq!(extract_summary("   "), "");
    }

    #[test]
    fn given_single_scoring_sentence_when_summarizing_then_returns_it() {
        let text = "The quick brown fox jumps over the lazy dog.";
        assert_eq!(extract_summary(text), text);
    }

    #[test]
    fn given_only_stop_words_when_summarizing_then_returns_empty() {
        assert_eq!(extract_summary("It is what it is."), "");
    }
}
