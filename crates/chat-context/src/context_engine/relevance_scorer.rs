//! Keyword-overlap relevance scoring

use crate::utils::KeywordExtractor;
use std::collections::HashSet;

/// Scores a message against a keyword pool with the Jaccard index, scaled to
/// an integer in `0..=100`.
pub struct RelevanceScorer<'a> {
    extractor: &'a KeywordExtractor,
}

impl<'a> RelevanceScorer<'a> {
    pub fn new(extractor: &'a KeywordExtractor) -> Self {
        Self { extractor }
    }

    /// Score `content` against `context_keywords`. An empty pool scores 0.
    pub fn score<S: AsRef<str>>(&self, content: &str, context_keywords: &[S]) -> u8 {
        let pool: HashSet<&str> = context_keywords.iter().map(|k| k.as_ref()).collect();
        self.score_against_pool(content, &pool)
    }

    /// Same as [`score`](Self::score) with the pool already collected.
    pub fn score_against_pool(&self, content: &str, pool: &HashSet<&str>) -> u8 {
        if pool.is_empty() {
            return 0;
        }

        let message_keywords = self.extractor.extract_default(content);
        let message: HashSet<&str> = message_keywords.iter().map(String::as_str).collect();
        jaccard_percent(&message, pool)
    }
}

/// `|a ∩ b| * 100 / |a ∪ b|`, truncated. Two empty sets score 0.
pub fn jaccard_percent(a: &HashSet<&str>, b: &HashSet<&str>) -> u8 {
    let overlap = a.intersection(b).count();
    let union = a.len() + b.len() - overlap;
    if union == 0 {
        return 0;
    }
    (overlap * 100 / union) as u8
}
