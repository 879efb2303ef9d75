//! Context window selection

use crate::context_engine::relevance_scorer::RelevanceScorer;
use crate::memory::Message;
use std::collections::HashSet;
use tracing::debug;

/// Picks the bounded subset of a conversation handed to the model.
pub struct MessageSelector<'a> {
    scorer: RelevanceScorer<'a>,
}

impl<'a> MessageSelector<'a> {
    pub fn new(scorer: RelevanceScorer<'a>) -> Self {
        Self { scorer }
    }

    /// Select from `messages` (ascending by `created_at`).
    ///
    /// - At most `window_size` messages: returned unchanged.
    /// - Recency mode: the last `window_size` messages.
    /// - Smart mode: the last `window_size / 2` messages plus the
    ///   `window_size / 2` best-scoring earlier ones, in time order. Scores are
    ///   computed here against the keywords of the whole input, the candidate's
    ///   own included, and are not written back to the messages.
    pub fn select(&self, messages: &[Message], window_size: usize, smart_selection: bool) -> Vec<Message> {
        if messages.len() <= window_size {
            return messages.to_vec();
        }

        if !smart_selection {
            debug!("Recency window: last {} of {} messages", window_size, messages.len());
            return last_n(messages, window_size).to_vec();
        }

        let half = window_size / 2;
        // half < len here, so the split never underflows and half == 0 leaves
        // `recent` empty instead of covering the whole history.
        let (candidates, recent) = messages.split_at(messages.len() - half);

        let pool: HashSet<&str> = messages
            .iter()
            .flat_map(|m| m.keywords.iter().map(String::as_str))
            .collect();

        let mut scored: Vec<(u8, &Message)> = candidates
            .iter()
            .map(|m| (self.scorer.score_against_pool(&m.content, &pool), m))
            .collect();
        // Stable: equal scores keep chronological order.
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        let mut selected: Vec<Message> = scored
            .into_iter()
            .take(half)
            .map(|(_, m)| m.clone())
            .chain(recent.iter().cloned())
            .collect();
        selected.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        debug!(
            "Smart selection: {} recent + {} relevant of {} messages (pool {} keywords)",
            recent.len(),
            selected.len() - recent.len(),
            messages.len(),
            pool.len()
        );
        selected
    }
}

fn last_n(messages: &[Message], n: usize) -> &[Message] {
    &messages[messages.len().saturating_sub(n)..]
}
