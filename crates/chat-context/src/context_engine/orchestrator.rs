use crate::config::ContextConfig;
use crate::context_engine::{
    message_selector::MessageSelector,
    relevance_scorer::RelevanceScorer,
    summary_generator::{SummaryFormat, SummaryGenerator},
};
use crate::error::Result;
use crate::memory::{Message, SessionContextConfig};
use crate::utils::KeywordExtractor;
use tracing::{debug, info};

/// Composes keyword extraction, selection and summarization into the
/// operations the storage layer calls.
///
/// Every operation is synchronous and works only on the data passed in.
/// `recompute_summary` reprocesses the whole history on each call, so its cost
/// grows with the session length. Two appends racing on one session each
/// summarize the snapshot they read and the last write wins; callers needing
/// ordering must serialize summary writes per session, as
/// [`InMemoryChatStore`](crate::memory::InMemoryChatStore) does.
#[derive(Clone, Default)]
pub struct ContextPipeline {
    extractor: KeywordExtractor,
    summarizer: SummaryGenerator,
}

impl ContextPipeline {
    pub fn new(extractor: KeywordExtractor, summarizer: SummaryGenerator) -> Self {
        Self { extractor, summarizer }
    }

    pub fn from_config(config: &ContextConfig) -> Result<Self> {
        let extractor = KeywordExtractor::new(config.tokenizer()?, config.text_policy()?)
            .with_max_keywords(config.max_keywords);
        let summarizer =
            SummaryGenerator::new(SummaryFormat::default()).with_top_topics(config.summary_topics);

        info!(
            "Context pipeline initialized (max keywords {}, summary topics {})",
            config.max_keywords, config.summary_topics
        );
        Ok(Self::new(extractor, summarizer))
    }

    pub fn extractor(&self) -> &KeywordExtractor {
        &self.extractor
    }

    pub fn extract_keywords(&self, text: &str, max_keywords: usize) -> Vec<String> {
        self.extractor.extract(text, max_keywords)
    }

    pub fn score_relevance<S: AsRef<str>>(&self, content: &str, context_keywords: &[S]) -> u8 {
        RelevanceScorer::new(&self.extractor).score(content, context_keywords)
    }

    pub fn select_messages(&self, messages: &[Message], window_size: usize, smart_selection: bool) -> Vec<Message> {
        MessageSelector::new(RelevanceScorer::new(&self.extractor)).select(messages, window_size, smart_selection)
    }

    pub fn generate_summary(&self, messages: &[Message], max_length: usize) -> String {
        self.summarizer.summarize(messages, max_length)
    }

    /// Attach keywords from the message's own content. The stored score is
    /// 0: no pool exists yet at ingestion, and later selection scores are
    /// transient.
    pub fn enrich_on_ingest(&self, mut message: Message) -> Message {
        message.keywords = self.extractor.extract_default(&message.content);
        message.relevance_score = 0;
        debug!(
            "Enriched {} message with {} keywords",
            message.role,
            message.keywords.len()
        );
        message
    }

    /// Regenerate the session summary from the full history, or `None` when
    /// summaries are disabled for the session.
    pub fn recompute_summary(&self, config: &SessionContextConfig, messages: &[Message]) -> Option<String> {
        if !config.summary_enabled {
            debug!("Summary disabled, skipping recompute");
            return None;
        }

        let window = self.select_messages(messages, config.window_size, config.smart_selection);
        let summary = self.generate_summary(&window, config.max_summary_length);
        debug!(
            "Recomputed summary from {} of {} messages ({} chars)",
            window.len(),
            messages.len(),
            summary.chars().count()
        );
        Some(summary)
    }

    /// Messages for the chat-read path: the selected window when the caller
    /// asks for context and the session has both context and smart selection
    /// on, otherwise the full history.
    pub fn messages_for_display(
        &self,
        config: &SessionContextConfig,
        messages: &[Message],
        use_context: bool,
    ) -> Vec<Message> {
        if use_context && config.context_enabled && config.smart_selection {
            self.select_messages(messages, config.window_size, true)
        } else {
            messages.to_vec()
        }
    }
}
