//! Fixed-lexicon polarity analyzer.
//!
//! Scoring is delegated to the VADER rules and their bundled ~7,500-entry
//! lexicon (words, slang and emoticons). This module maps the raw component
//! map onto [`SentimentScore`] with the rounding used in stored tables.

use std::collections::HashMap;
use std::fmt;

use vader_sentiment::SentimentIntensityAnalyzer;

use crate::types::SentimentScore;

/// Fixed-lexicon sentiment analyzer. Build once, score many texts.
pub struct SentimentAnalyzer {
    inner: SentimentIntensityAnalyzer<'static>,
}

impl fmt::Debug for SentimentAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SentimentAnalyzer").finish_non_exhaustive()
    }
}

impl Default for SentimentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentAnalyzer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: SentimentIntensityAnalyzer::new(),
        }
    }

    /// Score `text`.
    ///
    /// Text without any token yields the all-zero score.
    #[must_use]
    pub fn polarity_scores(&self, text: &str) -> SentimentScore {
        from_components(&self.inner.polarity_scores(text))
    }
}

/// Proportions to three decimals, compound to four.
fn from_components(components: &HashMap<&str, f64>) -> SentimentScore {
    let component = |key: &str| components.get(key).copied().unwrap_or(0.0);
    SentimentScore {
        neg: round_to(component("neg"), 3),
        neu: round_to(component("neu"), 3),
        pos: round_to(component("pos"), 3),
        compound: round_to(component("compound"), 4),
    }
}

/// Round through decimal formatting so values match their printed form.
fn round_to(value: f64, decimals: usize) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    format!("{value:.decimals$}").parse().unwrap_or(value)
}
