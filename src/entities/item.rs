//! Item entity type

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Server-assigned item identifier
pub type ItemId = i64;

/// A single inventory record as held by the remote API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Server-assigned, immutable
    pub id: ItemId,

    pub name: String,

    /// Unsigned so a negative count can never enter the cache
    pub quantity: u64,

    /// Server-assigned creation time (absent on some legacy rows)
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

impl Item {
    /// Stock classification used by the table badge and the printed report
    pub fn level(&self) -> QuantityLevel {
        QuantityLevel::from_quantity(self.quantity)
    }

    /// Creation date for display, or a dash when the server sent none
    pub fn created_display(&self) -> String {
        self.created_at
            .as_ref()
            .map(Timestamp::format_date)
            .unwrap_or_else(|| "-".to_string())
    }
}

/// Request body for create and update
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemFields {
    pub name: String,
    pub quantity: u64,
}

/// Stock level badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuantityLevel {
    /// Nothing left
    Out,
    /// Fewer than [`QuantityLevel::LOW_THRESHOLD`]
    Low,
    Ok,
}

impl QuantityLevel {
    pub const LOW_THRESHOLD: u64 = 10;

    pub fn from_quantity(quantity: u64) -> Self {
        match quantity {
            0 => QuantityLevel::Out,
            q if q < Self::LOW_THRESHOLD => QuantityLevel::Low,
            _ => QuantityLevel::Ok,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QuantityLevel::Out => "out",
            QuantityLevel::Low => "low",
            QuantityLevel::Ok => "ok",
        }
    }

    /// CSS class used in the printable report
    pub fn css_class(&self) -> &'static str {
        match self {
            QuantityLevel::Out => "qty-out",
            QuantityLevel::Low => "qty-low",
            QuantityLevel::Ok => "qty-ok",
        }
    }
}

impl std::fmt::Display for QuantityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A server timestamp, kept verbatim alongside its parsed value
///
/// The API is not consistent about the shape it sends (RFC 3339, SQL style
/// `YYYY-MM-DD HH:MM:SS`, or a bare date), so parsing is lenient and an
/// unparseable value is displayed as received rather than failing the load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamp {
    raw: String,
    parsed: Option<DateTime<Utc>>,
}

impl Timestamp {
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let parsed = parse_lenient(raw.trim());
        Self { raw, parsed }
    }

    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        self.parsed
    }

    /// Short date, e.g. "Jan 1, 2024"
    pub fn format_date(&self) -> String {
        match self.parsed {
            Some(at) => at.format("%b %-d, %Y").to_string(),
            None => self.raw.clone(),
        }
    }

    /// Date and time, e.g. "Jan 1, 2024 09:30"
    pub fn format_datetime(&self) -> String {
        match self.parsed {
            Some(at) => at.format("%b %-d, %Y %H:%M").to_string(),
            None => self.raw.clone(),
        }
    }
}

fn parse_lenient(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.parsed
            .cmp(&other.parsed)
            .then_with(|| self.raw.cmp(&other.raw))
    }
}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Timestamp::parse(raw))
    }
}
