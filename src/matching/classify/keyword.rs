//! Substring keyword classification.
//!
//! Matching is plain, case-sensitive substring containment: no tokenization
//! and no stemming. Tables are scanned in declaration order, so callers that
//! care about priority put the most important category first.

/// Keywords of one category found in a text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeywordMatch<C> {
    /// Matched category.
    pub category: C,
    /// Every keyword of the category that occurs in the text, in table order.
    pub keywords: Vec<&'static str>,
}

/// Ordered category -> keyword-list table.
#[derive(Clone, Copy, Debug)]
pub struct KeywordClassifier<C: 'static> {
    table: &'static [(C, &'static [&'static str])],
}

impl<C: Copy> KeywordClassifier<C> {
    /// Wrap a static keyword table.
    #[must_use]
    pub const fn new(table: &'static [(C, &'static [&'static str])]) -> Self {
        Self { table }
    }

    /// All categories with at least one hit, each with all of its hits.
    #[must_use]
    pub fn classify(&self, text: &str) -> Vec<KeywordMatch<C>> {
        self.table
            .iter()
            .filter_map(|(category, keywords)| {
                let hits: Vec<&'static str> = keywords
                    .iter()
                    .copied()
                    .filter(|kw| text.contains(kw))
                    .collect();
                (!hits.is_empty()).then_some(KeywordMatch {
                    category: *category,
                    keywords: hits,
                })
            })
            .collect()
    }

    /// The first keyword of the first category that occurs in the text.
    #[must_use]
    pub fn first_match(&self, text: &str) -> Option<(C, &'static str)> {
        self.table.iter().find_map(|(category, keywords)| {
            keywords
                .iter()
                .copied()
                .find(|kw| text.contains(kw))
                .map(|kw| (*category, kw))
        })
    }

    /// Every matched keyword across all categories.
    ///
    /// A keyword listed under several categories is reported once per category.
    #[must_use]
    pub fn matched_keywords(&self, text: &str) -> Vec<&'static str> {
        self.table
            .iter()
            .flat_map(|(_, keywords)| keywords.iter().copied())
            .filter(|kw| text.contains(kw))
            .collect()
    }
}

/// Whether any of `words` occurs in `text`.
#[must_use]
pub fn contains_any(text: &str, words: &[&str]) -> bool {
    words.iter().any(|w| text.contains(w))
}
