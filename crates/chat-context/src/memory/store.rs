//! In-memory chat session store driving the context pipeline

use crate::context_engine::ContextPipeline;
use crate::error::{ContextError, Result};
use crate::memory::message::Message;
use crate::memory::session::{SessionContextConfig, SessionContextUpdate};
use dashmap::DashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// Storage-side contract: persist messages and session settings, calling the
/// pipeline on ingest and on read.
pub trait ChatStore: Send + Sync {
    fn create_session(&self, session_id: &str, config: SessionContextConfig);
    /// Enrich and store `message`, then refresh the session summary when
    /// summaries are enabled. Returns the stored message.
    ///
    /// History stays ascending by `created_at` whatever the arrival order;
    /// equal timestamps keep arrival order.
    fn append_message(&self, session_id: &str, message: Message) -> Result<Message>;
    fn messages(&self, session_id: &str) -> Result<Vec<Message>>;
    /// The read path: selected window or full history per session settings.
    fn context_messages(&self, session_id: &str, use_context: bool) -> Result<Vec<Message>>;
    fn session_config(&self, session_id: &str) -> Result<SessionContextConfig>;
    fn update_settings(&self, session_id: &str, update: SessionContextUpdate) -> Result<SessionContextConfig>;
    /// Recompute and store the summary on demand.
    fn refresh_summary(&self, session_id: &str) -> Result<Option<String>>;
    fn remove_session(&self, session_id: &str) -> bool;
}

#[derive(Debug)]
struct SessionRecord {
    config: SessionContextConfig,
    messages: Vec<Message>,
    next_id: i64,
}

impl SessionRecord {
    fn refresh_summary(&mut self, pipeline: &ContextPipeline) -> Option<String> {
        let summary = pipeline.recompute_summary(&self.config, &self.messages)?;
        self.config.summary = Some(summary.clone());
        Some(summary)
    }
}

/// Sessions keyed by id. Each session sits behind its own mutex, so an append
/// and the summary it triggers are never interleaved with another append to
/// the same session.
#[derive(Clone)]
pub struct InMemoryChatStore {
    sessions: Arc<DashMap<String, Arc<Mutex<SessionRecord>>>>,
    pipeline: Arc<ContextPipeline>,
}

impl InMemoryChatStore {
    pub fn new(pipeline: ContextPipeline) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            pipeline: Arc::new(pipeline),
        }
    }

    pub fn pipeline(&self) -> &ContextPipeline {
        &self.pipeline
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    fn session(&self, session_id: &str) -> Result<Arc<Mutex<SessionRecord>>> {
        // Clone the handle out so the shard lock is released before we block
        // on the session mutex.
        self.sessions
            .get(session_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| ContextError::SessionNotFound(session_id.to_string()))
    }
}

impl Default for InMemoryChatStore {
    fn default() -> Self {
        Self::new(ContextPipeline::default())
    }
}

fn lock(record: &Mutex<SessionRecord>) -> MutexGuard<'_, SessionRecord> {
    record.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ChatStore for InMemoryChatStore {
    fn create_session(&self, session_id: &str, config: SessionContextConfig) {
        let record = SessionRecord {
            config,
            messages: Vec::new(),
            next_id: 1,
        };
        if self
            .sessions
            .insert(session_id.to_string(), Arc::new(Mutex::new(record)))
            .is_some()
        {
            warn!("Session {} already existed and was replaced", session_id);
        }
        info!("Created chat session {}", session_id);
    }

    fn append_message(&self, session_id: &str, message: Message) -> Result<Message> {
        let session = self.session(session_id)?;
        let mut record = lock(&session);

        let mut stored = self.pipeline.enrich_on_ingest(message);
        stored.id = Some(record.next_id);
        record.next_id += 1;
        let at = record
            .messages
            .partition_point(|m| m.created_at <= stored.created_at);
        record.messages.insert(at, stored.clone());

        if record.config.summary_enabled {
            record.refresh_summary(&self.pipeline);
        }

        debug!(
            "Appended message {:?} to session {} ({} total)",
            stored.id,
            session_id,
            record.messages.len()
        );
        Ok(stored)
    }

    fn messages(&self, session_id: &str) -> Result<Vec<Message>> {
        let session = self.session(session_id)?;
        let record = lock(&session);
        Ok(record.messages.clone())
    }

    fn context_messages(&self, session_id: &str, use_context: bool) -> Result<Vec<Message>> {
        let session = self.session(session_id)?;
        let record = lock(&session);
        Ok(self
            .pipeline
            .messages_for_display(&record.config, &record.messages, use_context))
    }

    fn session_config(&self, session_id: &str) -> Result<SessionContextConfig> {
        let session = self.session(session_id)?;
        let record = lock(&session);
        Ok(record.config.clone())
    }

    fn update_settings(&self, session_id: &str, update: SessionContextUpdate) -> Result<SessionContextConfig> {
        let session = self.session(session_id)?;
        let mut record = lock(&session);
        record.config.apply(update)?;
        info!("Updated context settings for session {}", session_id);
        Ok(record.config.clone())
    }

    fn refresh_summary(&self, session_id: &str) -> Result<Option<String>> {
        let session = self.session(session_id)?;
        let mut record = lock(&session);
        Ok(record.refresh_summary(&self.pipeline))
    }

    fn remove_session(&self, session_id: &str) -> bool {
        let removed = self.sessions.remove(session_id).is_some();
        if removed {
            info!("Removed chat session {}", session_id);
        }
        removed
    }
}
