// chat-context/crates/chat-context/src/lib.rs

pub mod config;
pub mod context_engine;
pub mod error;
pub mod memory;
pub mod telemetry;
pub mod utils;

use lazy_static::lazy_static;

// Public API exports
pub use config::ContextConfig;
pub use context_engine::{ContextPipeline, MessageSelector, RelevanceScorer, SummaryFormat, SummaryGenerator};
pub use error::{ContextError, Result};
pub use memory::{ChatStore, InMemoryChatStore, Message, Role, SessionContextConfig, SessionContextUpdate};
pub use utils::{JiebaTokenizer, KeywordExtractor, TextPolicy, Tokenizer, WhitespaceTokenizer};

lazy_static! {
    static ref DEFAULT_PIPELINE: ContextPipeline = ContextPipeline::default();
}

/// Function-level surface over a shared default pipeline (dictionary
/// segmentation, built-in stopwords, Chinese summary labels). Build a
/// [`ContextPipeline`] from [`ContextConfig`] for anything else.
pub fn extract_keywords(text: &str, max_keywords: usize) -> Vec<String> {
    DEFAULT_PIPELINE.extract_keywords(text, max_keywords)
}

pub fn score_relevance<S: AsRef<str>>(content: &str, context_keywords: &[S]) -> u8 {
    DEFAULT_PIPELINE.score_relevance(content, context_keywords)
}

pub fn select_relevant_messages(messages: &[Message], window_size: usize, smart_selection: bool) -> Vec<Message> {
    DEFAULT_PIPELINE.select_messages(messages, window_size, smart_selection)
}

pub fn generate_summary(messages: &[Message], max_length: usize) -> String {
    DEFAULT_PIPELINE.generate_summary(messages, max_length)
}

pub fn enrich_on_ingest(message: Message) -> Message {
    DEFAULT_PIPELINE.enrich_on_ingest(message)
}

pub fn recompute_summary(config: &SessionContextConfig, messages: &[Message]) -> Option<String> {
    DEFAULT_PIPELINE.recompute_summary(config, messages)
}
