// chat-context/crates/chat-context/src/config.rs

use crate::error::{ContextError, Result};
use crate::memory::session::{SessionContextConfig, DEFAULT_MAX_SUMMARY_LENGTH, DEFAULT_WINDOW_SIZE};
use crate::utils::{
    JiebaTokenizer, TextPolicy, Tokenizer, DEFAULT_MAX_KEYWORDS, DEFAULT_SCRIPT_FILTER,
};
use crate::context_engine::DEFAULT_SUMMARY_TOPICS;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextConfig {
    pub max_keywords: usize,
    pub summary_topics: usize,
    pub window_size: usize,
    pub smart_selection: bool,
    pub summary_enabled: bool,
    pub max_summary_length: usize,
    /// Replaces the built-in stopword set when present.
    pub stop_words: Option<Vec<String>>,
    pub extra_stop_words: Vec<String>,
    pub script_filter: String,
    pub user_dict: Option<PathBuf>,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            max_keywords: DEFAULT_MAX_KEYWORDS,
            summary_topics: DEFAULT_SUMMARY_TOPICS,
            window_size: DEFAULT_WINDOW_SIZE,
            smart_selection: true,
            summary_enabled: true,
            max_summary_length: DEFAULT_MAX_SUMMARY_LENGTH,
            stop_words: None,
            extra_stop_words: Vec::new(),
            script_filter: DEFAULT_SCRIPT_FILTER.to_string(),
            user_dict: None,
        }
    }
}

impl ContextConfig {
    pub fn from_env() -> Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            warn!("Failed to load .env file: {}. Using system environment variables.", e);
        } else {
            info!("Loaded environment variables from .env file");
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let window_size = parse_or(&lookup, "CONTEXT_WINDOW_SIZE", defaults.window_size)?;
        if window_size == 0 {
            return Err(ContextError::Config("CONTEXT_WINDOW_SIZE must be positive".into()));
        }

        let config = Self {
            max_keywords: parse_or(&lookup, "CONTEXT_MAX_KEYWORDS", defaults.max_keywords)?,
            summary_topics: parse_or(&lookup, "CONTEXT_SUMMARY_TOPICS", defaults.summary_topics)?,
            window_size,
            smart_selection: bool_or(&lookup, "CONTEXT_SMART_SELECTION", defaults.smart_selection)?,
            summary_enabled: bool_or(&lookup, "CONTEXT_SUMMARY_ENABLED", defaults.summary_enabled)?,
            max_summary_length: parse_or(
                &lookup,
                "CONTEXT_MAX_SUMMARY_LENGTH",
                defaults.max_summary_length,
            )?,
            stop_words: lookup("CONTEXT_STOP_WORDS").map(|raw| split_list(&raw)),
            extra_stop_words: lookup("CONTEXT_EXTRA_STOP_WORDS")
                .map(|raw| split_list(&raw))
                .unwrap_or_default(),
            script_filter: lookup("CONTEXT_SCRIPT_FILTER").unwrap_or(defaults.script_filter),
            user_dict: lookup("CONTEXT_USER_DICT")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        };

        info!(
            "Context configuration: window {}, smart selection {}, summary {} (max {} chars), {} keywords per message",
            config.window_size,
            config.smart_selection,
            config.summary_enabled,
            config.max_summary_length,
            config.max_keywords
        );
        Ok(config)
    }

    pub fn text_policy(&self) -> Result<TextPolicy> {
        let policy = match &self.stop_words {
            Some(words) => TextPolicy::new(words.iter().cloned(), &self.script_filter)?,
            None => TextPolicy::new(TextPolicy::default_stop_words(), &self.script_filter)?,
        };
        Ok(policy.with_extra_stop_words(self.extra_stop_words.iter().cloned()))
    }

    pub fn tokenizer(&self) -> Result<Arc<dyn Tokenizer>> {
        match &self.user_dict {
            Some(path) => Ok(Arc::new(JiebaTokenizer::with_user_dict(path)?)),
            None => Ok(Arc::new(JiebaTokenizer::default())),
        }
    }

    /// Settings for a newly created session. Each call builds a fresh value.
    pub fn session_defaults(&self) -> SessionContextConfig {
        SessionContextConfig {
            window_size: self.window_size,
            smart_selection: self.smart_selection,
            summary_enabled: self.summary_enabled,
            max_summary_length: self.max_summary_length,
            ..SessionContextConfig::default()
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| ContextError::Config(format!("{} = `{}`: {}", key, raw, e))),
    }
}

fn bool_or<F>(lookup: &F, key: &str, default: bool) -> Result<bool>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => match raw.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ContextError::Config(format!("{} = `{}`: expected a boolean", key, raw))),
        },
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(String::from)
        .collect()
}
