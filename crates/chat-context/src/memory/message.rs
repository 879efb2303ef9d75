//! Chat message records as seen by the context engine

use crate::error::{ContextError, Result};
use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ContextError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            "system" => Ok(Role::System),
            other => Err(ContextError::invalid("role", format!("unknown role `{}`", other))),
        }
    }
}

/// A chat message plus the context fields attached at ingestion.
///
/// The engine never edits `role`, `content` or `created_at`. `keywords` and
/// `relevance_score` are derived once by
/// [`ContextPipeline::enrich_on_ingest`](crate::context_engine::ContextPipeline::enrich_on_ingest).
/// The stored score is always 0; selection computes its own scores and never
/// writes them back.
///
/// `created_at` keeps the offset it was written with. Ordering compares
/// instants; the summary date range reads the local calendar date.
///
/// Deserializing goes through [`Message::from_record`], so serde and record
/// decoding accept and reject the same inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct Message {
    /// Storage row id, carried through selection untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<FixedOffset>,
    #[serde(default, alias = "context_keywords")]
    pub keywords: Vec<String>,
    #[serde(default, alias = "context_relevance_score")]
    pub relevance_score: u8,
}

impl Message {
    /// New, not yet enriched message stamped with the current time.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self::at(role, content, Utc::now())
    }

    pub fn at(role: Role, content: impl Into<String>, created_at: impl Into<DateTime<FixedOffset>>) -> Self {
        Self {
            id: None,
            role,
            content: content.into(),
            created_at: created_at.into(),
            keywords: Vec::new(),
            relevance_score: 0,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Decode a stored message record.
    ///
    /// `role`, `content` and `created_at` are required. Keywords may be absent
    /// or null for rows written before enrichment existed; they decode as
    /// empty. Both the short field names and the storage column names
    /// (`context_keywords`, `context_relevance_score`) are accepted.
    pub fn from_record(record: &Value) -> Result<Self> {
        let obj = record
            .as_object()
            .ok_or_else(|| ContextError::invalid("message", "expected a JSON object"))?;

        let role = required_str(obj, "role")?.parse::<Role>()?;
        let content = required_str(obj, "content")?.to_string();
        let created_at = parse_timestamp(required_str(obj, "created_at")?)
            .ok_or_else(|| ContextError::invalid("created_at", "not an ISO-8601 timestamp"))?;

        let id = match obj.get("id") {
            None | Some(Value::Null) => None,
            Some(v) => Some(
                v.as_i64()
                    .ok_or_else(|| ContextError::invalid("id", "expected an integer"))?,
            ),
        };

        let keywords = match first_present(obj, &["keywords", "context_keywords"]) {
            None => Vec::new(),
            Some(v) => serde_json::from_value(v.clone())
                .map_err(|e| ContextError::invalid("keywords", e.to_string()))?,
        };

        let relevance_score = match first_present(obj, &["relevance_score", "context_relevance_score"]) {
            None => 0,
            Some(v) => v
                .as_u64()
                .filter(|score| *score <= 100)
                .ok_or_else(|| ContextError::invalid("relevance_score", "expected an integer in 0..=100"))?
                as u8,
        };

        Ok(Self {
            id,
            role,
            content,
            created_at,
            keywords,
            relevance_score,
        })
    }

    /// Decode a JSON array of message records, failing on the first bad one.
    pub fn from_records(records: &Value) -> Result<Vec<Self>> {
        records
            .as_array()
            .ok_or_else(|| ContextError::invalid("messages", "expected a JSON array"))?
            .iter()
            .map(Self::from_record)
            .collect()
    }
}

impl TryFrom<Value> for Message {
    type Error = ContextError;

    fn try_from(record: Value) -> Result<Self> {
        Self::from_record(&record)
    }
}

fn required_str<'a>(obj: &'a Map<String, Value>, field: &'static str) -> Result<&'a str> {
    match obj.get(field) {
        None | Some(Value::Null) => Err(ContextError::MissingField(field)),
        Some(v) => v
            .as_str()
            .ok_or_else(|| ContextError::invalid(field, "expected a string")),
    }
}

fn first_present<'a>(obj: &'a Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    names
        .iter()
        .filter_map(|name| obj.get(*name))
        .find(|v| !v.is_null())
}

/// RFC 3339 with its offset kept, or a naive ISO-8601 datetime taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt);
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc().fixed_offset())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_role_round_trip_strings() {
        for role in [Role::User, Role::Assistant, Role::System] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("tool".parse::<Role>().is_err());
    }

    #[test]
    fn test_from_record_full() {
        let record = json!({
            "id": 7,
            "role": "assistant",
            "content": "天气很好",
            "created_at": "2024-03-01T08:30:00+00:00",
            "context_keywords": ["天气"],
            "context_relevance_score": 0
        });
        let msg = Message::from_record(&record).unwrap();
        assert_eq!(msg.id, Some(7));
        assert_eq!(msg.role, Role::Assistant);
        assert_eq!(msg.keywords, vec!["天气"]);
        assert_eq!(msg.created_at, Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap().fixed_offset());
    }

    #[test]
    fn test_from_record_keeps_offset() {
        let record = json!({
            "role": "user",
            "content": "早上好",
            "created_at": "2024-06-01T07:00:00+08:00"
        });
        let msg = Message::from_record(&record).unwrap();
        assert_eq!(msg.created_at.offset().local_minus_utc(), 8 * 3600);
        assert_eq!(msg.created_at.format("%Y-%m-%d").to_string(), "2024-06-01");
        assert_eq!(msg.created_at, Utc.with_ymd_and_hms(2024, 5, 31, 23, 0, 0).unwrap());

        let written = serde_json::to_value(&msg).unwrap();
        assert_eq!(written["created_at"], "2024-06-01T07:00:00+08:00");
    }

    #[test]
    fn test_from_record_naive_timestamp() {
        let record = json!({
            "role": "user",
            "content": "你好",
            "created_at": "2024-03-01T08:30:00.123456",
            "context_keywords": null
        });
        let msg = Message::from_record(&record).unwrap();
        assert!(msg.keywords.is_empty());
        assert_eq!(msg.created_at.format("%Y-%m-%d").to_string(), "2024-03-01");
    }

    #[test]
    fn test_from_record_missing_field() {
        let record = json!({ "role": "user", "created_at": "2024-03-01T08:30:00Z" });
        let err = Message::from_record(&record).unwrap_err();
        assert!(matches!(err, ContextError::MissingField("content")));
        assert_eq!(err.to_string(), "missing field: content");
    }

    #[test]
    fn test_from_record_null_counts_as_missing() {
        let record = json!({ "role": null, "content": "x", "created_at": "2024-03-01T08:30:00Z" });
        assert!(matches!(
            Message::from_record(&record),
            Err(ContextError::MissingField("role"))
        ));
    }

    #[test]
    fn test_from_record_invalid_values() {
        let bad_role = json!({ "role": "robot", "content": "x", "created_at": "2024-03-01T08:30:00Z" });
        assert!(matches!(
            Message::from_record(&bad_role),
            Err(ContextError::InvalidField { field: "role", .. })
        ));

        let bad_time = json!({ "role": "user", "content": "x", "created_at": "yesterday" });
        assert!(matches!(
            Message::from_record(&bad_time),
            Err(ContextError::InvalidField { field: "created_at", .. })
        ));

        let bad_score = json!({
            "role": "user", "content": "x", "created_at": "2024-03-01T08:30:00Z",
            "relevance_score": 140
        });
        assert!(matches!(
            Message::from_record(&bad_score),
            Err(ContextError::InvalidField { field: "relevance_score", .. })
        ));
    }

    #[test]
    fn test_from_records_requires_array() {
        assert!(Message::from_records(&json!({})).is_err());
        assert!(Message::from_records(&json!([])).unwrap().is_empty());
    }

    #[test]
    fn test_serde_accepts_storage_column_names() {
        let msg: Message = serde_json::from_value(json!({
            "role": "user",
            "content": "你好",
            "created_at": "2024-03-01T08:30:00Z",
            "context_keywords": ["你好"]
        }))
        .unwrap();
        assert_eq!(msg.keywords, vec!["你好"]);
        assert_eq!(msg.relevance_score, 0);
    }

    #[test]
    fn test_serde_matches_record_rules() {
        let naive: Message = serde_json::from_value(json!({
            "role": "user",
            "content": "你好",
            "created_at": "2024-03-01T08:30:00.123456"
        }))
        .unwrap();
        assert_eq!(naive.created_at.format("%Y-%m-%d").to_string(), "2024-03-01");

        let out_of_range = serde_json::from_value::<Message>(json!({
            "role": "user",
            "content": "你好",
            "created_at": "2024-03-01T08:30:00Z",
            "relevance_score": 140
        }));
        assert!(out_of_range.is_err());

        let missing = serde_json::from_str::<Message>(r#"{"role": "user", "created_at": "2024-03-01T08:30:00Z"}"#);
        assert!(missing.unwrap_err().to_string().contains("missing field: content"));
    }

    #[test]
    fn test_serde_round_trip_keeps_offset() {
        let msg = Message::from_record(&json!({
            "id": 3,
            "role": "assistant",
            "content": "晚安",
            "created_at": "2024-06-02T23:30:00+08:00",
            "keywords": ["晚安"]
        }))
        .unwrap();
        let back: Message = serde_json::from_str(&serde_json::to_string(&msg).unwrap()).unwrap();
        assert_eq!(back, msg);
        assert_eq!(back.created_at.offset(), msg.created_at.offset());
    }
}
