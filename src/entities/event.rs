//! Audit event entity type
//!
//! Events are append-only records the server writes for every item mutation.
//! They reference an item by id only; the item may since have been deleted.

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::entities::item::{ItemId, Timestamp};

/// A single audit-log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub item_id: ItemId,
    pub event_type: EventType,
    #[serde(default)]
    pub payload: Payload,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

/// Event classification
///
/// The server may introduce new event types at any time; anything not known
/// here is carried as [`EventType::Other`] and rendered with its raw name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventType {
    Created,
    Updated,
    Deleted,
    Other(String),
}

impl EventType {
    pub fn as_str(&self) -> &str {
        match self {
            EventType::Created => "item_created",
            EventType::Updated => "item_updated",
            EventType::Deleted => "item_deleted",
            EventType::Other(raw) => raw,
        }
    }

    /// Human label shown in the audit trail
    pub fn label(&self) -> &str {
        match self {
            EventType::Created => "Created",
            EventType::Updated => "Updated",
            EventType::Deleted => "Deleted",
            EventType::Other(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, EventType::Other(_))
    }
}

impl From<String> for EventType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "item_created" => EventType::Created,
            "item_updated" => EventType::Updated,
            "item_deleted" => EventType::Deleted,
            _ => EventType::Other(raw),
        }
    }
}

impl From<EventType> for String {
    fn from(event_type: EventType) -> Self {
        event_type.as_str().to_string()
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single payload value: either a scalar or an arbitrary nested structure
#[derive(Debug, Clone, PartialEq)]
pub enum PayloadValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
    Nested(Value),
}

impl From<Value> for PayloadValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => PayloadValue::Null,
            Value::Bool(b) => PayloadValue::Bool(b),
            Value::Number(n) => PayloadValue::Number(n),
            Value::String(s) => PayloadValue::Text(s),
            nested @ (Value::Array(_) | Value::Object(_)) => PayloadValue::Nested(nested),
        }
    }
}

impl From<&PayloadValue> for Value {
    fn from(value: &PayloadValue) -> Self {
        match value {
            PayloadValue::Null => Value::Null,
            PayloadValue::Bool(b) => Value::Bool(*b),
            PayloadValue::Number(n) => Value::Number(n.clone()),
            PayloadValue::Text(s) => Value::String(s.clone()),
            PayloadValue::Nested(v) => v.clone(),
        }
    }
}

impl std::fmt::Display for PayloadValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PayloadValue::Null => write!(f, "null"),
            PayloadValue::Bool(b) => write!(f, "{}", b),
            PayloadValue::Number(n) => write!(f, "{}", n),
            PayloadValue::Text(s) => write!(f, "{}", s),
            // Compact JSON is the textual form of nested values
            PayloadValue::Nested(v) => write!(f, "{}", v),
        }
    }
}

/// Ordered key/value payload attached to an event
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload(Vec<(String, PayloadValue)>);

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PayloadValue>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&PayloadValue> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PayloadValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// `key: value` display lines in server order
    pub fn lines(&self) -> Vec<String> {
        self.iter().map(|(k, v)| format!("{}: {}", k, v)).collect()
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Payload::new(),
            Value::Object(map) => Payload(
                map.into_iter()
                    .map(|(k, v)| (k, PayloadValue::from(v)))
                    .collect(),
            ),
            // Not a mapping; keep the data visible rather than dropping it
            other => Payload(vec![("value".to_string(), PayloadValue::from(other))]),
        }
    }
}

impl Serialize for Payload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, &Value::from(value))?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Payload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Payload::from(Value::deserialize(deserializer)?))
    }
}
