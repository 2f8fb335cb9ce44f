use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Opaque record identifier.
///
/// Stored documents may carry ids in any string format, so ids are compared
/// as text. Freshly created records get a UUID v4 rendered as a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Identifies entities that expose a stable unique identifier.
pub trait Identifiable {
    fn id(&self) -> &RecordId;
}

/// Reads a numeric field without rejecting the whole record.
///
/// Numbers and numeric strings decode as-is. `null`, a missing field or any
/// other value decodes as NaN, which aggregations count as zero.
pub fn lenient_f64<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(number)) => number.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(text)) => text.trim().parse().unwrap_or(f64::NAN),
        _ => f64::NAN,
    })
}

pub(crate) fn missing_number() -> f64 {
    f64::NAN
}

/// Display language for report titles and animal names.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ur,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Language::En => "en",
            Language::Ur => "ur",
        };
        f.write_str(label)
    }
}

/// Rounds a monetary or quantity total to two decimal places.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value * 100.0).round() / 100.0
}

/// Returns the value when it is a usable number, zero otherwise.
pub fn contribution(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Same as [`contribution`] for optional amounts; absent counts as zero.
pub fn optional_contribution(value: Option<f64>) -> f64 {
    value.map(contribution).unwrap_or(0.0)
}

/// Drops zero and non-numeric expenses so they are stored as absent.
pub fn normalize_expense(value: Option<f64>) -> Option<f64> {
    value.filter(|amount| amount.is_finite() && *amount != 0.0)
}
