//! Per-session context settings

use crate::error::{ContextError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_WINDOW_SIZE: usize = 10;
pub const DEFAULT_MAX_SUMMARY_LENGTH: usize = 200;

/// Context settings owned by a chat session.
///
/// Created together with the session; changed only through
/// [`apply`](Self::apply) or by summary regeneration, which touches `summary`
/// alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContextConfig {
    pub window_size: usize,
    pub smart_selection: bool,
    pub summary_enabled: bool,
    pub max_summary_length: usize,
    pub summary: Option<String>,
    /// When off, readers always get the full history.
    pub context_enabled: bool,
}

impl Default for SessionContextConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            smart_selection: true,
            summary_enabled: true,
            max_summary_length: DEFAULT_MAX_SUMMARY_LENGTH,
            summary: None,
            context_enabled: true,
        }
    }
}

/// Partial settings change; `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContextUpdate {
    pub window_size: Option<usize>,
    pub smart_selection: Option<bool>,
    pub summary_enabled: Option<bool>,
    pub max_summary_length: Option<usize>,
    pub context_enabled: Option<bool>,
}

impl SessionContextConfig {
    pub fn apply(&mut self, update: SessionContextUpdate) -> Result<()> {
        if update.window_size == Some(0) {
            return Err(ContextError::invalid("window_size", "must be positive"));
        }

        if let Some(window_size) = update.window_size {
            self.window_size = window_size;
        }
        if let Some(smart_selection) = update.smart_selection {
            self.smart_selection = smart_selection;
        }
        if let Some(summary_enabled) = update.summary_enabled {
            self.summary_enabled = summary_enabled;
        }
        if let Some(max_summary_length) = update.max_summary_length {
            self.max_summary_length = max_summary_length;
        }
        if let Some(context_enabled) = update.context_enabled {
            self.context_enabled = context_enabled;
        }
        Ok(())
    }

    /// Decode a stored chat session row.
    ///
    /// `context_window_size` and `enable_context_summary` are required.
    /// `context_settings` is a free-form map holding `smart_selection` and
    /// `max_summary_length`; when it is absent every call starts from fresh
    /// defaults, nothing is shared between records.
    pub fn from_record(record: &Value) -> Result<Self> {
        let obj = record
            .as_object()
            .ok_or_else(|| ContextError::invalid("session", "expected a JSON object"))?;

        let window_size = match obj.get("context_window_size") {
            None | Some(Value::Null) => return Err(ContextError::MissingField("context_window_size")),
            Some(v) => v
                .as_u64()
                .filter(|n| *n > 0)
                .ok_or_else(|| ContextError::invalid("context_window_size", "expected a positive integer"))?
                as usize,
        };

        let summary_enabled = match obj.get("enable_context_summary") {
            None | Some(Value::Null) => return Err(ContextError::MissingField("enable_context_summary")),
            Some(v) => v
                .as_bool()
                .ok_or_else(|| ContextError::invalid("enable_context_summary", "expected a boolean"))?,
        };

        let context_enabled = optional_bool(obj, "enable_context")?.unwrap_or(true);

        let summary = match obj.get("context_summary") {
            None | Some(Value::Null) => None,
            Some(v) => Some(
                v.as_str()
                    .ok_or_else(|| ContextError::invalid("context_summary", "expected a string"))?
                    .to_string(),
            ),
        };

        let settings = match obj.get("context_settings") {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(map)) => map.clone(),
            Some(_) => return Err(ContextError::invalid("context_settings", "expected a JSON object")),
        };

        let smart_selection = optional_bool(&settings, "smart_selection")?.unwrap_or(true);
        let max_summary_length = match settings.get("max_summary_length") {
            None | Some(Value::Null) => DEFAULT_MAX_SUMMARY_LENGTH,
            Some(v) => v
                .as_u64()
                .ok_or_else(|| ContextError::invalid("max_summary_length", "expected an integer"))?
                as usize,
        };

        Ok(Self {
            window_size,
            smart_selection,
            summary_enabled,
            max_summary_length,
            summary,
            context_enabled,
        })
    }
}

fn optional_bool(obj: &Map<String, Value>, field: &'static str) -> Result<Option<bool>> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_bool()
            .map(Some)
            .ok_or_else(|| ContextError::invalid(field, "expected a boolean")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = SessionContextConfig::default();
        assert_eq!(config.window_size, 10);
        assert!(config.smart_selection);
        assert!(config.summary_enabled);
        assert_eq!(config.max_summary_length, 200);
        assert!(config.summary.is_none());
        assert!(config.context_enabled);
    }

    #[test]
    fn test_apply_partial_update() {
        let mut config = SessionContextConfig::default();
        config
            .apply(SessionContextUpdate {
                window_size: Some(4),
                smart_selection: Some(false),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(config.window_size, 4);
        assert!(!config.smart_selection);
        assert!(config.summary_enabled);
        assert_eq!(config.max_summary_length, 200);
    }

    #[test]
    fn test_apply_rejects_zero_window() {
        let mut config = SessionContextConfig::default();
        let err = config
            .apply(SessionContextUpdate {
                window_size: Some(0),
                summary_enabled: Some(false),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, ContextError::InvalidField { field: "window_size", .. }));
        // Rejected updates change nothing.
        assert!(config.summary_enabled);
    }

    #[test]
    fn test_from_record() {
        let record = json!({
            "context_window_size": 6,
            "enable_context": false,
            "enable_context_summary": true,
            "context_summary": "旧摘要",
            "context_settings": { "smart_selection": false, "max_summary_length": 80 }
        });
        let config = SessionContextConfig::from_record(&record).unwrap();
        assert_eq!(config.window_size, 6);
        assert!(!config.context_enabled);
        assert!(!config.smart_selection);
        assert_eq!(config.max_summary_length, 80);
        assert_eq!(config.summary.as_deref(), Some("旧摘要"));
    }

    #[test]
    fn test_from_record_without_settings_map() {
        let record = json!({ "context_window_size": 10, "enable_context_summary": false });
        let config = SessionContextConfig::from_record(&record).unwrap();
        assert!(config.smart_selection);
        assert_eq!(config.max_summary_length, 200);
        assert!(!config.summary_enabled);
    }

    #[test]
    fn test_from_record_missing_fields() {
        let err = SessionContextConfig::from_record(&json!({ "enable_context_summary": true })).unwrap_err();
        assert!(matches!(err, ContextError::MissingField("context_window_size")));

        let err = SessionContextConfig::from_record(&json!({ "context_window_size": 3 })).unwrap_err();
        assert!(matches!(err, ContextError::MissingField("enable_context_summary")));
    }

    #[test]
    fn test_from_record_bad_settings_shape() {
        let record = json!({
            "context_window_size": 3,
            "enable_context_summary": true,
            "context_settings": "smart"
        });
        assert!(matches!(
            SessionContextConfig::from_record(&record),
            Err(ContextError::InvalidField { field: "context_settings", .. })
        ));
    }
}
