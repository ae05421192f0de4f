use crate::error::{Result, TrackerError};

pub const DEFAULT_THRESHOLD: f64 = 0.8;

/// Scores from a window of the title are discounted so a complete title
/// match always ranks above a partial one.
const PARTIAL_MATCH_WEIGHT: f64 = 0.9;

/// Fuzzy title matcher based on Jaro-Winkler similarity.
///
/// A title scores the best of:
/// 1. the similarity of the whole title to the query
/// 2. the best similarity of any run of consecutive title words with the
///    same word count as the query, times `PARTIAL_MATCH_WEIGHT`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TitleMatcher {
    threshold: f64,
}

impl Default for TitleMatcher {
    fn default() -> Self {
        TitleMatcher {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl TitleMatcher {
    pub fn new(threshold: f64) -> Result<TitleMatcher> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(TrackerError::Config(format!(
                "search threshold {} is not between 0 and 1",
                threshold
            )));
        }
        Ok(TitleMatcher { threshold })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Similarity between 0.0 and 1.0.
    pub fn similarity(&self, query: &str, title: &str) -> f64 {
        let query_words = normalize(query);
        let title_words = normalize(title);
        if query_words.is_empty() || title_words.is_empty() {
            return 0.0;
        }

        let whole = strsim::jaro_winkler(&query_words.join(" "), &title_words.join(" "));
        if query_words.len() >= title_words.len() {
            return whole;
        }

        let query_text = query_words.join(" ");
        let partial = title_words
            .windows(query_words.len())
            .map(|window| strsim::jaro_winkler(&query_text, &window.join(" ")))
            .fold(0.0, f64::max);

        whole.max(partial * PARTIAL_MATCH_WEIGHT)
    }

    /// Returns the score when the title is close enough to the query.
    pub fn score(&self, query: &str, title: &str) -> Option<f64> {
        Some(self.similarity(query, title)).filter(|s| *s >= self.threshold)
    }
}

fn normalize(text: &str) -> Vec<String> {
    text.split_whitespace().map(|w| w.to_lowercase()).collect()
}
