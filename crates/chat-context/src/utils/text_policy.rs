//! Token acceptance policy: stopwords, minimum length and script filter

use crate::error::{ContextError, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

/// Tokens made only of characters outside the CJK Unified Ideographs block.
pub const DEFAULT_SCRIPT_FILTER: &str = r"^[^\x{4E00}-\x{9FFF}]+$";

lazy_static! {
    static ref DEFAULT_STOP_WORDS: Vec<&'static str> = vec![
        "的", "了", "在", "是", "我", "有", "和", "就", "不", "人", "都", "一",
        "一个", "上", "也", "很", "到", "说", "要", "去", "你", "会", "着",
        "没有", "看", "好", "自己", "这",
    ];
    static ref DEFAULT_SCRIPT_REGEX: Regex = Regex::new(DEFAULT_SCRIPT_FILTER).unwrap();
}

/// Decides which segmented tokens may become keywords.
#[derive(Debug, Clone)]
pub struct TextPolicy {
    stop_words: HashSet<String>,
    script_filter: Regex,
    min_chars: usize,
}

impl Default for TextPolicy {
    fn default() -> Self {
        Self {
            stop_words: Self::default_stop_words(),
            script_filter: DEFAULT_SCRIPT_REGEX.clone(),
            min_chars: 2,
        }
    }
}

impl TextPolicy {
    /// Build a policy from a stopword set and a script-filter pattern.
    /// Tokens matching `script_filter` are rejected.
    pub fn new<I, S>(stop_words: I, script_filter: &str) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let script_filter = Regex::new(script_filter).map_err(|e| {
            ContextError::Config(format!("invalid script filter `{}`: {}", script_filter, e))
        })?;

        Ok(Self {
            stop_words: stop_words.into_iter().map(Into::into).collect(),
            script_filter,
            min_chars: 2,
        })
    }

    pub fn default_stop_words() -> HashSet<String> {
        DEFAULT_STOP_WORDS.iter().map(|w| w.to_string()).collect()
    }

    pub fn with_extra_stop_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stop_words.extend(words.into_iter().map(Into::into));
        self
    }

    pub fn with_min_chars(mut self, min_chars: usize) -> Self {
        self.min_chars = min_chars;
        self
    }

    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(token)
    }

    pub fn is_filtered_script(&self, token: &str) -> bool {
        self.script_filter.is_match(token)
    }

    /// Whether an already-trimmed token survives every filter.
    pub fn accepts(&self, token: &str) -> bool {
        token.chars().count() >= self.min_chars
            && !self.is_stop_word(token)
            && !self.is_filtered_script(token)
    }

    pub fn stop_words(&self) -> &HashSet<String> {
        &self.stop_words
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_rejects_single_chars() {
        let policy = TextPolicy::default();
        assert!(!policy.accepts("猫"));
        assert!(policy.accepts("猫咪"));
    }

    #[test]
    fn test_default_policy_rejects_stop_words() {
        let policy = TextPolicy::default();
        assert!(policy.is_stop_word("一个"));
        assert!(!policy.accepts("一个"));
        assert!(!policy.accepts("没有"));
    }

    #[test]
    fn test_default_policy_rejects_latin_and_digits() {
        let policy = TextPolicy::default();
        assert!(!policy.accepts("rust"));
        assert!(!policy.accepts("2024"));
        assert!(!policy.accepts("hello, world!"));
    }

    #[test]
    fn test_mixed_script_token_survives() {
        let policy = TextPolicy::default();
        assert!(policy.accepts("A股"));
        assert!(policy.accepts("3号线"));
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // A single Han character is three bytes in UTF-8.
        let policy = TextPolicy::default();
        assert!(!policy.accepts("书"));
    }

    #[test]
    fn test_custom_policy() {
        let policy = TextPolicy::new(["rust"], r"^\d+$").unwrap();
        assert!(!policy.accepts("rust"));
        assert!(!policy.accepts("42"));
        assert!(policy.accepts("tokio"));
        assert!(policy.accepts("的话"));
    }

    #[test]
    fn test_invalid_script_filter() {
        let result = TextPolicy::new(Vec::<String>::new(), "[unclosed");
        assert!(matches!(result, Err(ContextError::Config(_))));
    }

    #[test]
    fn test_extra_stop_words_extend_defaults() {
        let policy = TextPolicy::default().with_extra_stop_words(["我们"]);
        assert!(policy.is_stop_word("我们"));
        assert!(policy.is_stop_word("自己"));
    }
}
