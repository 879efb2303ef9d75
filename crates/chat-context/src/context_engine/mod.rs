//! Context engine module - Scores, selects and summarizes chat history

pub mod message_selector;
pub mod orchestrator;
pub mod relevance_scorer;
pub mod summary_generator;

pub use message_selector::MessageSelector;
pub use orchestrator::ContextPipeline;
pub use relevance_scorer::{jaccard_percent, RelevanceScorer};
pub use summary_generator::{SummaryFormat, SummaryGenerator, DEFAULT_SUMMARY_TOPICS};

/// Default Context Pipeline
pub fn create_default_pipeline() -> crate::error::Result<ContextPipeline> {
    let config = crate::config::ContextConfig::default();
    ContextPipeline::from_config(&config)
}
