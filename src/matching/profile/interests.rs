//! Interest tag extraction with cumulative mention counts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::matching::classify::keyword::KeywordClassifier;
use crate::matching::classify::lexicon::INTEREST_KEYWORDS;
use crate::matching::core::kinds::InterestCategory;

/// An interest keyword and how often it was mentioned.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestCount {
    /// Interest keyword.
    pub interest: String,
    /// Number of recorded mentions.
    pub count: usize,
}

/// Extracts interest keywords and keeps a running tally for its lifetime.
#[derive(Clone, Debug)]
pub struct InterestExtractor {
    classifier: KeywordClassifier<InterestCategory>,
    // Insertion-ordered so ties in `top_interests` keep first-mention order.
    counts: Vec<(&'static str, usize)>,
}

impl Default for InterestExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl InterestExtractor {
    /// Create an extractor over the built-in interest lexicon.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            classifier: KeywordClassifier::new(INTEREST_KEYWORDS),
            counts: Vec::new(),
        }
    }

    /// Extract interest keywords from `text` and record the mentions.
    ///
    /// A keyword listed under several categories appears (and is counted)
    /// once per category; callers de-duplicate as needed.
    pub fn extract(&mut self, text: &str) -> Vec<&'static str> {
        let found = self.classifier.matched_keywords(text);
        for keyword in found.iter().copied() {
            self.record(keyword);
        }
        found
    }

    /// Matched keywords grouped by category, without touching the tally.
    #[must_use]
    pub fn categorize(&self, text: &str) -> BTreeMap<InterestCategory, Vec<&'static str>> {
        self.classifier
            .classify(text)
            .into_iter()
            .map(|hit| (hit.category, hit.keywords))
            .collect()
    }

    /// The `limit` most mentioned keywords, most frequent first.
    ///
    /// Ties keep the order in which keywords were first mentioned.
    #[must_use]
    pub fn top_interests(&self, limit: usize) -> Vec<InterestCount> {
        let mut ranked = self.counts.clone();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
            .into_iter()
            .take(limit)
            .map(|(interest, count)| InterestCount {
                interest: interest.to_string(),
                count,
            })
            .collect()
    }

    /// Recorded mentions of one keyword.
    #[must_use]
    pub fn mentions(&self, keyword: &str) -> usize {
        self.counts
            .iter()
            .find(|(kw, _)| *kw == keyword)
            .map_or(0, |(_, count)| *count)
    }

    fn record(&mut self, keyword: &'static str) {
        match self.counts.iter_mut().find(|(kw, _)| *kw == keyword) {
            Some((_, count)) => *count += 1,
            None => self.counts.push((keyword, 1)),
        }
    }
}
