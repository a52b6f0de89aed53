//! Naive keyword extraction.
//!
//! Lower-case, split on word boundaries, drop short tokens and stop words, keep
//! the first few survivors in order. No stemming, phrase detection or
//! weighting; presentation timing assumes at most a handful of short single
//! words per utterance.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::settings::KeywordSettings;

/// Closed stop-word list: articles, conjunctions, prepositions, auxiliary and
/// modal verbs, demonstratives.
pub const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "is", "are", "was", "were", "be", "been", "have", "has", "had", "do", "does", "did", "will",
    "would", "could", "should", "may", "might", "can", "this", "that", "these", "those",
];

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w+\b").expect("valid word pattern"));

/// Returns true if `word` (already lower-cased) is a stop word
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// Keyword extractor with configurable thresholds
#[derive(Clone, Debug)]
pub struct KeywordExtractor {
    /// Minimum token length in characters
    min_length: usize,
    /// Maximum keywords kept per text
    max_keywords: usize,
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::from_settings(&KeywordSettings::default())
    }
}

impl KeywordExtractor {
    pub fn from_settings(settings: &KeywordSettings) -> Self {
        Self {
            min_length: settings.min_length,
            max_keywords: settings.max_per_utterance,
        }
    }

    /// Extracts candidate keywords from stripped utterance text
    pub fn extract(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        WORD.find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|word| word.chars().count() >= self.min_length && !is_stop_word(word))
            .take(self.max_keywords)
            .map(str::to_string)
            .collect()
    }
}

/// Extracts keywords with the default thresholds
pub fn extract_keywords(text: &str) -> Vec<String> {
    KeywordExtractor::default().extract(text)
}
