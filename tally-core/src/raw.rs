//! Raw task candidates: loosely-typed records as they arrive in the input
//! document, before normalization.
//!
//! Every field is captured as a tagged `RawField` so conversion never fails on
//! a bad value. Only the document itself (invalid JSON, or not an array) can
//! be rejected.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq)]
pub enum RawField {
    #[default]
    Missing,
    Null,
    Text(String),
    Number(f64),
    Bool(bool),
    /// Arrays and objects: present but unusable.
    Other,
}

impl RawField {
    fn from_value(v: Option<&Value>) -> Self {
        match v {
            None => RawField::Missing,
            Some(Value::Null) => RawField::Null,
            Some(Value::String(s)) => RawField::Text(s.clone()),
            Some(Value::Number(n)) => n.as_f64().map_or(RawField::Other, RawField::Number),
            Some(Value::Bool(b)) => RawField::Bool(*b),
            Some(_) => RawField::Other,
        }
    }

    /// Non-blank text, trimmed. Numbers are rendered so numeric ids survive.
    pub fn as_text(&self) -> Option<String> {
        match self {
            RawField::Text(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            RawField::Number(n) if n.is_finite() => Some(n.to_string()),
            _ => None,
        }
    }

    /// Numeric coercion: numbers as-is, numeric strings parsed.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RawField::Number(n) => Some(*n),
            RawField::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// RFC 3339 timestamp, or epoch milliseconds.
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            RawField::Text(s) => DateTime::parse_from_rfc3339(s.trim())
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            RawField::Number(ms) if ms.is_finite() => {
                DateTime::<Utc>::from_timestamp_millis(*ms as i64)
            }
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, RawField::Missing | RawField::Null)
    }
}

impl From<&str> for RawField {
    fn from(s: &str) -> Self {
        RawField::Text(s.to_string())
    }
}

impl From<String> for RawField {
    fn from(s: String) -> Self {
        RawField::Text(s)
    }
}

impl From<f64> for RawField {
    fn from(n: f64) -> Self {
        RawField::Number(n)
    }
}

/// One task candidate, every field optional and untyped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTask {
    pub id: RawField,
    pub title: RawField,
    pub revenue: RawField,
    pub time_taken: RawField,
    pub priority: RawField,
    pub status: RawField,
    pub notes: RawField,
    pub created_at: RawField,
    pub completed_at: RawField,
}

impl RawTask {
    /// Total conversion: anything that is not an object becomes an empty candidate.
    pub fn from_value(value: &Value) -> Self {
        let empty = Map::new();
        let obj = value.as_object().unwrap_or(&empty);
        let field = |camel: &str, snake: &str| {
            RawField::from_value(obj.get(camel).or_else(|| obj.get(snake)))
        };

        Self {
            id: field("id", "id"),
            title: field("title", "title"),
            revenue: field("revenue", "revenue"),
            time_taken: field("timeTaken", "time_taken"),
            priority: field("priority", "priority"),
            status: field("status", "status"),
            notes: field("notes", "notes"),
            created_at: field("createdAt", "created_at"),
            completed_at: field("completedAt", "completed_at"),
        }
    }
}

/// Parse the input document: a JSON array of task candidates.
pub fn parse_document(text: &str) -> Result<Vec<RawTask>> {
    let doc: Value = serde_json::from_str(text).context("parse task document")?;
    let Value::Array(items) = doc else {
        bail!("task document must be a JSON array");
    };
    Ok(items.iter().map(RawTask::from_value).collect())
}
