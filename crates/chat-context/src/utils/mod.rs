//! Utilities module - Tokenization, text policy and keyword extraction

pub mod keyword_extractor;
pub mod text_policy;
pub mod text_utils;
pub mod tokenizer;

// Re-export commonly used utilities
pub use keyword_extractor::{most_common, KeywordExtractor, DEFAULT_MAX_KEYWORDS};
pub use text_policy::{TextPolicy, DEFAULT_SCRIPT_FILTER};
pub use text_utils::TextUtils;
pub use tokenizer::{JiebaTokenizer, Tokenizer, WhitespaceTokenizer};
