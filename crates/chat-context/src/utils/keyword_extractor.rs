//! Frequency-ranked keyword extraction

use crate::utils::text_policy::TextPolicy;
use crate::utils::tokenizer::{JiebaTokenizer, Tokenizer};
use std::collections::HashMap;
use std::sync::Arc;

pub const DEFAULT_MAX_KEYWORDS: usize = 10;

/// Turns raw text into its most frequent content words.
#[derive(Clone)]
pub struct KeywordExtractor {
    tokenizer: Arc<dyn Tokenizer>,
    policy: TextPolicy,
    max_keywords: usize,
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new(Arc::new(JiebaTokenizer::default()), TextPolicy::default())
    }
}

impl KeywordExtractor {
    pub fn new(tokenizer: Arc<dyn Tokenizer>, policy: TextPolicy) -> Self {
        Self {
            tokenizer,
            policy,
            max_keywords: DEFAULT_MAX_KEYWORDS,
        }
    }

    /// Limit used by [`extract_default`](Self::extract_default).
    pub fn with_max_keywords(mut self, max_keywords: usize) -> Self {
        self.max_keywords = max_keywords;
        self
    }

    pub fn max_keywords(&self) -> usize {
        self.max_keywords
    }

    pub fn policy(&self) -> &TextPolicy {
        &self.policy
    }

    /// Up to `max_keywords` distinct keywords, most frequent first. Equal
    /// counts keep the order in which the words first appeared.
    pub fn extract(&self, text: &str, max_keywords: usize) -> Vec<String> {
        let accepted = self
            .tokenizer
            .tokenize(text)
            .into_iter()
            .map(str::trim)
            .filter(|token| self.policy.accepts(token));

        most_common(accepted, max_keywords)
    }

    pub fn extract_default(&self, text: &str) -> Vec<String> {
        self.extract(text, self.max_keywords)
    }
}

/// Count occurrences and return the `limit` most common items.
///
/// Counts live in a first-seen ordered vector and are ranked with a stable
/// sort, so ties resolve by first appearance rather than hash order.
pub fn most_common<I, S>(items: I, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for item in items {
        let item = item.as_ref();
        match index.get(item) {
            Some(&pos) => counts[pos].1 += 1,
            None => {
                index.insert(item.to_string(), counts.len());
                counts.push((item.to_string(), 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(limit);
    counts.into_iter().map(|(word, _)| word).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::tokenizer::WhitespaceTokenizer;

    fn whitespace_extractor() -> KeywordExtractor {
        KeywordExtractor::new(Arc::new(WhitespaceTokenizer), TextPolicy::default())
    }

    #[test]
    fn test_most_common_ranks_by_count() {
        let ranked = most_common(["b", "a", "a", "c", "a", "b"], 10);
        assert_eq!(ranked, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_most_common_ties_keep_first_appearance() {
        let ranked = most_common(["西瓜", "苹果", "香蕉", "苹果", "西瓜", "香蕉"], 10);
        assert_eq!(ranked, vec!["西瓜", "苹果", "香蕉"]);
    }

    #[test]
    fn test_most_common_limit() {
        assert_eq!(most_common(["a", "b", "c"], 2), vec!["a", "b"]);
        assert!(most_common(["a", "b"], 0).is_empty());
    }

    #[test]
    fn test_extract_filters_and_ranks() {
        let extractor = whitespace_extractor();
        let keywords = extractor.extract("香蕉 苹果 苹果 的 rust 2024 猫 自己 香蕉 苹果", 10);
        assert_eq!(keywords, vec!["苹果", "香蕉"]);
    }

    #[test]
    fn test_extract_respects_limit() {
        let extractor = whitespace_extractor();
        let keywords = extractor.extract("苹果 香蕉 橘子 葡萄", 2);
        assert_eq!(keywords, vec!["苹果", "香蕉"]);
    }

    #[test]
    fn test_extract_empty_text() {
        let extractor = whitespace_extractor();
        assert!(extractor.extract("", 10).is_empty());
        assert!(extractor.extract_default("   ").is_empty());
    }

    #[test]
    fn test_extract_default_limit() {
        let extractor = whitespace_extractor().with_max_keywords(1);
        assert_eq!(extractor.extract_default("苹果 香蕉 香蕉"), vec!["香蕉"]);
    }

    #[test]
    fn test_default_extractor_drops_latin_tokens() {
        let extractor = KeywordExtractor::default();
        let keywords = extractor.extract("我们讨论 Rust 和 tokio 的天气", 10);
        assert!(keywords.iter().all(|k| k != "Rust" && k != "tokio"));
        assert!(keywords.iter().all(|k| k.chars().count() > 1));
    }
}
