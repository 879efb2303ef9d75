//! Short digest of a selected message window

use crate::memory::{Message, Role};
use crate::utils::{most_common, TextUtils};

pub const DEFAULT_SUMMARY_TOPICS: usize = 5;

/// Labels used when assembling a summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryFormat {
    pub topics_label: String,
    pub topic_separator: String,
    pub user_label: String,
    pub assistant_label: String,
    pub count_suffix: String,
    pub range_label: String,
    pub range_separator: String,
    pub segment_separator: String,
}

impl Default for SummaryFormat {
    fn default() -> Self {
        Self {
            topics_label: "主要话题：".into(),
            topic_separator: ", ".into(),
            user_label: "用户消息：".into(),
            assistant_label: "助手回复：".into(),
            count_suffix: "条".into(),
            range_label: "时间范围：".into(),
            range_separator: " 至 ".into(),
            segment_separator: " | ".into(),
        }
    }
}

impl SummaryFormat {
    pub fn english() -> Self {
        Self {
            topics_label: "Topics: ".into(),
            user_label: "User messages: ".into(),
            assistant_label: "Assistant replies: ".into(),
            count_suffix: String::new(),
            range_label: "Date range: ".into(),
            range_separator: " to ".into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct SummaryGenerator {
    format: SummaryFormat,
    top_topics: usize,
}

impl Default for SummaryGenerator {
    fn default() -> Self {
        Self::new(SummaryFormat::default())
    }
}

impl SummaryGenerator {
    pub fn new(format: SummaryFormat) -> Self {
        Self {
            format,
            top_topics: DEFAULT_SUMMARY_TOPICS,
        }
    }

    pub fn with_top_topics(mut self, top_topics: usize) -> Self {
        self.top_topics = top_topics;
        self
    }

    /// Topics, per-role counts and date range joined by the segment
    /// separator, clipped to `max_length` characters. Empty input gives an
    /// empty string.
    pub fn summarize(&self, messages: &[Message], max_length: usize) -> String {
        let (first, last) = match (messages.first(), messages.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return String::new(),
        };
        let f = &self.format;

        let topics = most_common(messages.iter().flat_map(|m| m.keywords.iter()), self.top_topics);
        let user_count = messages.iter().filter(|m| m.role == Role::User).count();
        let assistant_count = messages.iter().filter(|m| m.role == Role::Assistant).count();

        let mut parts = Vec::with_capacity(4);
        if !topics.is_empty() {
            parts.push(format!("{}{}", f.topics_label, topics.join(f.topic_separator.as_str())));
        }
        parts.push(format!("{}{}{}", f.user_label, user_count, f.count_suffix));
        parts.push(format!("{}{}{}", f.assistant_label, assistant_count, f.count_suffix));
        // Calendar dates in each timestamp's own offset.
        parts.push(format!(
            "{}{}{}{}",
            f.range_label,
            first.created_at.format("%Y-%m-%d"),
            f.range_separator,
            last.created_at.format("%Y-%m-%d")
        ));

        let summary = parts.join(f.segment_separator.as_str());
        TextUtils::truncate_with_ellipsis(&summary, max_length).into_owned()
    }
}
